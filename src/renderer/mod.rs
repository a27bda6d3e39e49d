//! Engine adapters for rendering template files
//!
//! - `interface`: The adapter trait and the options every adapter receives
//! - `mustache`: Mustache rendering
//! - `minijinja`: Twig-like rendering
//! - `filters`: The `slugify` helper

pub mod filters;
pub mod interface;
pub mod minijinja;
pub mod mustache;

pub use self::minijinja::MiniJinjaAdapter;
pub use self::mustache::MustacheAdapter;
pub use interface::{EngineAdapter, EngineOptions, OptionsHook};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Which templating syntax a template folder uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EngineKind {
    /// `{{name}}` interpolation with `{{> partial}}` includes
    #[default]
    Mustache,
    /// `{{ name }}` interpolation with `{% include %}` tags
    Twig,
}

impl EngineKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Mustache => "mustache",
            EngineKind::Twig => "twig",
        }
    }

    /// File extension for templates of this kind, the slugified kind name.
    pub fn extension(&self) -> String {
        filters::slugify(self.as_str())
    }

    /// Builds the adapter for this kind from the given options.
    pub fn adapter(&self, options: &EngineOptions) -> Box<dyn EngineAdapter> {
        match self {
            EngineKind::Mustache => Box::new(MustacheAdapter::new(options)),
            EngineKind::Twig => Box::new(MiniJinjaAdapter::new(options)),
        }
    }
}

impl Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mustache" => Ok(EngineKind::Mustache),
            "twig" => Ok(EngineKind::Twig),
            _ => Err(Error::UnknownEngineKind { kind: s.to_string() }),
        }
    }
}

impl TryFrom<String> for EngineKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
