use crate::{
    config::TemplateEngineConfig,
    constants::{CACHE_DIR, MISSING_TEMPLATE_PLACEHOLDER, PARTIALS_DIR},
    error::{Error, Result},
    ext::PathExt,
    ioutils::{ensure_directory, DirStatus, DirTarget},
    renderer::{EngineKind, EngineOptions, OptionsHook},
};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Renders template files from a folder with a mustache-like or twig-like
/// engine.
///
/// Construction checks that the folder exists and bootstraps its `partials/`
/// and `cache/` subdirectories. Templates are looked up as `<name>.<kind>`
/// (or `<name>` when the kind is not used as extension); a missing template
/// renders as [`MISSING_TEMPLATE_PLACEHOLDER`].
///
/// # Examples
///
/// ```no_run
/// use formwork::engine::TemplateEngine;
/// use formwork::renderer::EngineKind;
/// use serde_json::json;
///
/// let engine = TemplateEngine::new("/srv/templates", EngineKind::Mustache, true)?;
/// let html = engine.render("greeting", &json!({"name": "Ada"}))?;
/// # Ok::<(), formwork::error::Error>(())
/// ```
#[derive(Clone)]
pub struct TemplateEngine {
    root: PathBuf,
    kind: EngineKind,
    append_kind_as_extension: bool,
    autoescape: bool,
    strict_variables: bool,
    options_hook: Option<OptionsHook>,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("root", &self.root)
            .field("kind", &self.kind)
            .field("append_kind_as_extension", &self.append_kind_as_extension)
            .field("autoescape", &self.autoescape)
            .field("strict_variables", &self.strict_variables)
            .field("options_hook", &self.options_hook.is_some())
            .finish()
    }
}

impl TemplateEngine {
    /// Creates an engine for `root` with default escaping settings.
    ///
    /// # Arguments
    /// * `root` - Existing template folder
    /// * `kind` - Templating syntax of the folder
    /// * `append_kind_as_extension` - Look templates up as `<name>.<kind>`
    ///
    /// # Returns
    /// * `Result<Self>` - `TemplateRootMissing` when `root` does not exist,
    ///   `DirectoryCreationError` when `partials/` or `cache/` cannot be made
    pub fn new(
        root: impl AsRef<Path>,
        kind: EngineKind,
        append_kind_as_extension: bool,
    ) -> Result<Self> {
        let mut config = TemplateEngineConfig::new(root.as_ref(), kind);
        config.append_kind_as_extension = append_kind_as_extension;
        Self::from_config(config)
    }

    pub fn from_config(config: TemplateEngineConfig) -> Result<Self> {
        let root = Self::resolve_root(&config.root_path)?;
        let engine = Self {
            root,
            kind: config.engine_kind,
            append_kind_as_extension: config.append_kind_as_extension,
            autoescape: config.autoescape,
            strict_variables: config.strict_variables,
            options_hook: None,
        };
        engine.create_directory_structure()?;
        info!("Template engine ({}) ready at '{}'", engine.kind, engine.root.display());
        Ok(engine)
    }

    fn resolve_root(root_path: &Path) -> Result<PathBuf> {
        let raw = root_path.to_str_checked()?;
        if raw.trim().is_empty() {
            return Err(Error::TemplateRootMissing { template_dir: raw.to_string() });
        }
        let root = DirTarget::parse(raw).into_local()?;
        if !root.exists() {
            return Err(Error::TemplateRootMissing {
                template_dir: root.display().to_string(),
            });
        }
        Ok(root)
    }

    fn create_directory_structure(&self) -> Result<()> {
        for dir in [self.partials_dir(), self.cache_dir()] {
            match ensure_directory(&dir) {
                Ok(DirStatus::Existing) => debug!("'{}' already exists", dir.display()),
                Ok(DirStatus::Created) => debug!("Created '{}'", dir.display()),
                Ok(DirStatus::NotADirectory) => {
                    return Err(Error::NotADirectory { path: dir.display().to_string() })
                }
                Err(e) => {
                    warn!("Cannot create '{}': {e}", dir.display());
                    return Err(Error::DirectoryCreationError {
                        path: dir.display().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Installs an override applied to the adapter options before every render.
    pub fn with_options_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(EngineOptions) -> EngineOptions + Send + Sync + 'static,
    {
        self.options_hook = Some(Arc::new(hook));
        self
    }

    pub fn set_kind_as_extension(&mut self, flag: bool) {
        self.append_kind_as_extension = flag;
    }

    pub fn base_directory(&self) -> &Path {
        &self.root
    }

    pub fn partials_dir(&self) -> PathBuf {
        self.root.join(PARTIALS_DIR)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn extension(&self) -> String {
        self.kind.extension()
    }

    /// File name a template is stored under.
    pub fn file_name(&self, name: &str) -> String {
        if self.append_kind_as_extension {
            format!("{name}.{}", self.extension())
        } else {
            name.to_string()
        }
    }

    /// Path of the template file for `name`, or `TemplateNotFound`.
    pub fn resolve_template_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(self.file_name(name));
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::TemplateNotFound { path: path.display().to_string() })
        }
    }

    /// Options the adapter is built from, after the options hook.
    pub fn engine_options(&self) -> EngineOptions {
        let options = EngineOptions {
            loader_root: self.root.clone(),
            partials_root: self.partials_dir(),
            cache_dir: self.cache_dir(),
            extension: self.append_kind_as_extension.then(|| self.extension()),
            autoescape: self.autoescape,
            strict_variables: self.strict_variables,
        };
        match &self.options_hook {
            Some(hook) => hook(options),
            None => options,
        }
    }

    /// Renders the template `name` with `context`.
    ///
    /// # Returns
    /// * `Result<String>` - The rendered template, the missing-template
    ///   placeholder when the file does not exist, or the engine's error
    pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        if let Err(e) = self.resolve_template_path(name) {
            return match e {
                Error::TemplateNotFound { path } => {
                    warn!("Template '{path}' not found, rendering placeholder");
                    Ok(MISSING_TEMPLATE_PLACEHOLDER.to_string())
                }
                other => Err(other),
            };
        }

        let options = self.engine_options();
        let adapter = self.kind.adapter(&options);
        debug!("Rendering '{name}' with the {} engine", self.kind);
        adapter.render(&self.file_name(name), context)
    }

    /// Like [`render`](Self::render), but engine failures are logged and
    /// replaced by the placeholder.
    pub fn render_or_placeholder(&self, name: &str, context: &serde_json::Value) -> String {
        self.render(name, context).unwrap_or_else(|e| {
            warn!("Failed to render '{name}': {e}");
            MISSING_TEMPLATE_PLACEHOLDER.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_root_is_a_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let err =
            TemplateEngine::new(tmp.path().join("nope"), EngineKind::Mustache, true).unwrap_err();
        assert!(matches!(err, Error::TemplateRootMissing { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn empty_root_is_a_configuration_error() {
        let err = TemplateEngine::new("", EngineKind::Twig, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn bootstraps_partials_and_cache() {
        let tmp = TempDir::new().unwrap();
        let engine = TemplateEngine::new(tmp.path(), EngineKind::Mustache, true).unwrap();
        assert!(engine.partials_dir().is_dir());
        assert!(engine.cache_dir().is_dir());

        TemplateEngine::new(tmp.path(), EngineKind::Twig, true).unwrap();
    }

    #[test]
    fn file_in_place_of_cache_is_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("cache"), "").unwrap();
        let err = TemplateEngine::new(tmp.path(), EngineKind::Mustache, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn file_name_follows_extension_flag() {
        let tmp = TempDir::new().unwrap();
        let mut engine = TemplateEngine::new(tmp.path(), EngineKind::Twig, true).unwrap();
        assert_eq!(engine.file_name("page"), "page.twig");
        engine.set_kind_as_extension(false);
        assert_eq!(engine.file_name("page.html"), "page.html");
        assert!(engine.engine_options().extension.is_none());
    }

    #[test]
    fn resolves_existing_templates_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("page.mustache"), "x").unwrap();
        let engine = TemplateEngine::new(tmp.path(), EngineKind::Mustache, true).unwrap();

        assert_eq!(
            engine.resolve_template_path("page").unwrap(),
            tmp.path().join("page.mustache")
        );
        let err = engine.resolve_template_path("other").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn missing_template_renders_placeholder() {
        let tmp = TempDir::new().unwrap();
        let engine = TemplateEngine::new(tmp.path(), EngineKind::Mustache, true).unwrap();
        assert_eq!(
            engine.render("missing_template", &json!({})).unwrap(),
            MISSING_TEMPLATE_PLACEHOLDER
        );
    }

    #[test]
    fn options_hook_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("v.twig"), "{{ v }}").unwrap();
        let engine = TemplateEngine::new(tmp.path(), EngineKind::Twig, true)
            .unwrap()
            .with_options_hook(|options| EngineOptions { autoescape: false, ..options });

        assert!(!engine.engine_options().autoescape);
        assert_eq!(engine.render("v", &json!({"v": "<b>"})).unwrap(), "<b>");
    }

    #[test]
    fn render_errors_degrade_to_placeholder() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.twig"), "{% if %}").unwrap();
        let engine = TemplateEngine::new(tmp.path(), EngineKind::Twig, true).unwrap();

        let err = engine.render("broken", &json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert_eq!(
            engine.render_or_placeholder("broken", &json!({})),
            MISSING_TEMPLATE_PLACEHOLDER
        );
    }

    #[test]
    fn accepts_file_stream_roots() {
        let tmp = TempDir::new().unwrap();
        let root = format!("file://{}", tmp.path().display());
        let engine = TemplateEngine::new(root.as_str(), EngineKind::Mustache, true).unwrap();
        assert_eq!(engine.base_directory(), tmp.path());
    }
}
