//! Configuration types for the template engine

use crate::renderer::EngineKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn get_default_true() -> bool {
    true
}

/// Settings a [`TemplateEngine`](crate::engine::TemplateEngine) is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEngineConfig {
    /// Template folder; must exist when the engine is constructed
    pub root_path: PathBuf,
    /// Templating syntax of the folder
    #[serde(default, rename = "kind")]
    pub engine_kind: EngineKind,
    /// Look templates up as `<name>.<kind>` rather than `<name>`
    #[serde(default = "get_default_true")]
    pub append_kind_as_extension: bool,
    /// HTML-escape interpolated values
    #[serde(default = "get_default_true")]
    pub autoescape: bool,
    /// Fail on variables missing from the context
    #[serde(default)]
    pub strict_variables: bool,
}

impl TemplateEngineConfig {
    pub fn new(root_path: impl Into<PathBuf>, engine_kind: EngineKind) -> Self {
        Self {
            root_path: root_path.into(),
            engine_kind,
            append_kind_as_extension: true,
            autoescape: true,
            strict_variables: false,
        }
    }
}
