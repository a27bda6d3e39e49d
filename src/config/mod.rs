//! Configuration management for formwork
//!
//! This module contains the configuration system components:
//! - `types`: Template engine settings
//! - `loader`: Configuration file loading and parsing

pub mod loader;
pub mod types;


pub use loader::Config;
pub use types::TemplateEngineConfig;
