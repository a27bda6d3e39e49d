use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Options handed to an engine adapter when it is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Directory templates are loaded from
    pub loader_root: PathBuf,
    /// Directory mustache partials are loaded from. Twig templates include
    /// partials by their path under `loader_root` instead.
    pub partials_root: PathBuf,
    /// Reserved for compiled templates. Both engines compile in memory, so
    /// neither adapter writes here.
    pub cache_dir: PathBuf,
    /// Extension template files carry, `None` when names are used verbatim.
    /// Mustache partials use it too, falling back to `mustache`.
    pub extension: Option<String>,
    /// HTML-escape `{{ value }}` in twig templates. Mustache always escapes
    /// `{{value}}` and leaves `{{{value}}}` raw.
    pub autoescape: bool,
    /// Fail on variables missing from the context (twig)
    pub strict_variables: bool,
}

/// Caller-supplied override applied to [`EngineOptions`] before every
/// adapter is built.
pub type OptionsHook = Arc<dyn Fn(EngineOptions) -> EngineOptions + Send + Sync>;

/// A templating engine able to render a named template file.
pub trait EngineAdapter {
    /// Renders a template file with the given context.
    ///
    /// # Arguments
    /// * `file_name` - Template file name relative to the loader root
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, file_name: &str, context: &serde_json::Value) -> Result<String>;
}
