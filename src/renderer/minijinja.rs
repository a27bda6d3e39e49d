use super::filters::register_filters;
use crate::{
    error::Result,
    renderer::interface::{EngineAdapter, EngineOptions},
};
use log::debug;
use minijinja::{path_loader, AutoEscape, Environment, UndefinedBehavior};

/// Twig-like adapter backed by MiniJinja.
///
/// Templates load from the loader root through MiniJinja's path loader, so
/// `{% include "partials/header.twig" %}` resolves relative to the root.
pub struct MiniJinjaAdapter {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaAdapter {
    pub fn new(options: &EngineOptions) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(options.loader_root.clone()));

        let auto_escape = if options.autoescape { AutoEscape::Html } else { AutoEscape::None };
        env.set_auto_escape_callback(move |_| auto_escape);
        if options.strict_variables {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        register_filters(&mut env);

        debug!("MiniJinja loader rooted at '{}'", options.loader_root.display());
        Self { env }
    }
}

impl EngineAdapter for MiniJinjaAdapter {
    fn render(&self, file_name: &str, context: &serde_json::Value) -> Result<String> {
        let normalized_name = file_name.replace('\\', "/");
        let tmpl = self.env.get_template(&normalized_name)?;
        Ok(tmpl.render(context)?)
    }
}
