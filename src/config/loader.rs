//! Configuration loading and management

use crate::config::types::TemplateEngineConfig;
use crate::constants::CONFIG_FILENAMES;
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::fields::FieldRendererConfig;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration file contents.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Template engine settings, absent when only fields are configured
    #[serde(default)]
    pub engine: Option<TemplateEngineConfig>,
    /// Field rendering settings
    #[serde(default)]
    pub fields: FieldRendererConfig,
}

impl Config {
    /// Looks for a configuration file in `config_dir`, trying
    /// `formwork.json`, `formwork.yaml` and `formwork.yml` in that order.
    pub fn load_config<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();

        for config_file_name in CONFIG_FILENAMES.iter() {
            let config_file_path = config_dir.join(config_file_name);
            if config_file_path.exists() {
                return Self::from_file(&config_file_path);
            }
        }

        Err(Error::ConfigNotFound {
            config_dir: config_dir.to_str_checked()?.to_string(),
            config_files: CONFIG_FILENAMES.join(", "),
        })
    }

    /// Reads a configuration file, picking the format from its extension.
    /// A relative `engine.root_path` is resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!("Loading configuration from '{}'", path.display());

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        let mut config: Config = match extension {
            "json" => serde_json::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            _ => {
                return Err(Error::ConfigParseError {
                    path: path.to_str_checked()?.to_string(),
                })
            }
        };

        config.validate()?;

        if let (Some(engine), Some(base)) = (config.engine.as_mut(), path.parent()) {
            if engine.root_path.is_relative() {
                engine.root_path = base.join(&engine.root_path);
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(engine) = &self.engine {
            if engine.root_path.as_os_str().is_empty() {
                return Err(Error::ValidationError(
                    "engine.root_path must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}
