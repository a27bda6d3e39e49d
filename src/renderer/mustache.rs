use crate::{
    error::{Error, Result},
    ext::PathExt,
    renderer::interface::{EngineAdapter, EngineOptions},
};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension partials carry when template names are used verbatim.
const DEFAULT_PARTIAL_EXTENSION: &str = "mustache";

/// Mustache adapter.
///
/// Templates are compiled from the loader root and partials are loaded from
/// the partials directory by their relative path, without the extension, so
/// `partials/forms/row.mustache` is included with `{{> forms/row}}`. A
/// partial that does not exist renders as nothing.
///
/// `{{var}}` is always HTML-escaped; `{{{var}}}` and `{{&var}}` emit raw.
pub struct MustacheAdapter {
    context: ::mustache::Context,
    loader_root: PathBuf,
}

impl MustacheAdapter {
    pub fn new(options: &EngineOptions) -> Self {
        let mut context = ::mustache::Context::new(options.partials_root.clone());
        context.template_extension = options
            .extension
            .clone()
            .unwrap_or_else(|| DEFAULT_PARTIAL_EXTENSION.to_string());

        debug!(
            "Mustache partials from '{}' (*.{})",
            options.partials_root.display(),
            context.template_extension
        );
        Self { context, loader_root: options.loader_root.clone() }
    }

    /// Names of the partials available to templates.
    pub fn partial_names(&self) -> Vec<String> {
        let root = &self.context.template_path;
        if !root.is_dir() {
            return Vec::new();
        }

        WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path().extension().and_then(|ext| ext.to_str())
                    == Some(self.context.template_extension.as_str())
            })
            .filter_map(|e| {
                e.path()
                    .strip_prefix(root)
                    .ok()
                    .map(|relative| relative.with_extension("").to_template_name())
            })
            .collect()
    }

    /// Whether a partial with this name exists.
    pub fn has_partial(&self, name: &str) -> bool {
        self.partial_path(name).is_file()
    }

    fn partial_path(&self, name: &str) -> PathBuf {
        let mut path = self.context.template_path.join(Path::new(name));
        path.set_extension(&self.context.template_extension);
        path
    }
}

impl EngineAdapter for MustacheAdapter {
    fn render(&self, file_name: &str, context: &serde_json::Value) -> Result<String> {
        let source = fs::read_to_string(self.loader_root.join(file_name))?;
        let template = self.context.compile(source.chars())?;

        let mut out = Vec::new();
        template.render(&mut out, context)?;
        String::from_utf8(out).map_err(|e| Error::Other(anyhow::anyhow!(e)))
    }
}
