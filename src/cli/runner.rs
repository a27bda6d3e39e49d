use crate::{
    cli::args::{Cli, Commands, FieldsArgs, InitArgs, RenderArgs},
    config::{Config, TemplateEngineConfig},
    constants::STDIN_INDICATOR,
    engine::TemplateEngine,
    error::{Error, Result},
    fields::{FieldRenderer, FieldSet, UnknownTypePolicy},
    ioutils::{parse_context, read_from},
    renderer::EngineKind,
};
use log::info;
use std::path::Path;

/// Dispatches a parsed command line to the matching command.
pub struct Runner {
    command: Commands,
}

impl Runner {
    pub fn new(cli: Cli) -> Self {
        Self { command: cli.command }
    }

    /// Runs the command and returns what it prints.
    pub fn run(self) -> Result<String> {
        match &self.command {
            Commands::Fields(args) => run_fields(args),
            Commands::Render(args) => run_render(args),
            Commands::Init(args) => run_init(args),
        }
    }
}

/// Runs the command line and prints its output.
pub fn run(cli: Cli) -> Result<()> {
    let output = Runner::new(cli).run()?;
    println!("{output}");
    Ok(())
}

fn load_optional_config(config_dir: Option<&Path>) -> Result<Config> {
    match config_dir {
        Some(dir) => Config::load_config(dir),
        None => Ok(Config::default()),
    }
}

/// Renders a field set, one field per line. Fields that fail are logged
/// and left out.
pub fn run_fields(args: &FieldsArgs) -> Result<String> {
    let mut config = load_optional_config(args.config.as_deref())?.fields;
    if args.lenient {
        config.unknown_types = UnknownTypePolicy::Text;
    }
    if args.raw_textarea {
        config.escape_textarea = false;
    }

    let set = FieldSet::load(&args.file)?;
    set.validate()?;
    let total = set.len();

    let renderer = FieldRenderer::new(config);
    let markup: Vec<String> = renderer
        .render_set(set)
        .into_iter()
        .filter_map(|rendered| rendered.ok().map(|field| field.markup))
        .collect();

    info!("Rendered {} of {total} field(s)", markup.len());
    Ok(markup.join("\n"))
}

/// Renders one template. Command-line flags override the configuration; the
/// template folder comes from `--root`, else from `engine.root_path`.
pub fn run_render(args: &RenderArgs) -> Result<String> {
    let engine_config = load_optional_config(args.config.as_deref())?.engine;
    let mut config = match (engine_config, &args.root) {
        (Some(mut config), Some(root)) => {
            config.root_path = root.clone();
            config
        }
        (Some(config), None) => config,
        (None, Some(root)) => TemplateEngineConfig::new(root, EngineKind::default()),
        (None, None) => return Err(Error::NoTemplateRoot),
    };
    if let Some(engine) = args.engine {
        config.engine_kind = engine.into();
    }
    if args.no_extension {
        config.append_kind_as_extension = false;
    }

    let context = match args.context.as_deref() {
        Some(STDIN_INDICATOR) => parse_context(&read_from(std::io::stdin())?)?,
        Some(raw) => parse_context(raw)?,
        None => parse_context("")?,
    };

    let engine = TemplateEngine::from_config(config)?;
    engine.render(&args.name, &context)
}

/// Bootstraps a template folder.
pub fn run_init(args: &InitArgs) -> Result<String> {
    let engine = TemplateEngine::new(&args.root, EngineKind::default(), true)?;
    Ok(format!(
        "Template folder ready: partials in '{}', cache in '{}'.",
        engine.partials_dir().display(),
        engine.cache_dir().display()
    ))
}
