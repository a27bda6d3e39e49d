/// Handles argument parsing and command dispatch.
pub mod cli;

/// Configuration file handling.
pub mod config;

/// Constants shared across modules.
pub mod constants;

/// Template folder management and rendering.
pub mod engine;

/// Defines custom error types.
pub mod error;

/// Extension traits for standard library types.
pub mod ext;

/// Declarative HTML form fields.
pub mod fields;

/// A set of helpers for working with the file system.
pub mod ioutils;

/// Engine adapters for the supported templating syntaxes.
pub mod renderer;
