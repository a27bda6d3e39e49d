use crate::constants::{exit_codes, verbosity};
use crate::renderer::EngineKind;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::fmt::Display;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Templating syntax selectable on the command line.
#[derive(Debug, Clone, ValueEnum, Copy, PartialEq)]
#[value(rename_all = "lowercase")]
pub enum EngineArg {
    /// `{{name}}` templates with `{{> partial}}` includes.
    Mustache,
    /// `{{ name }}` templates with `{% include %}` tags.
    Twig,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Mustache => EngineKind::Mustache,
            EngineArg::Twig => EngineKind::Twig,
        }
    }
}

impl Display for EngineArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", EngineKind::from(*self))
    }
}

/// formwork: render form fields and templates.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every field of a JSON or YAML field set.
    Fields(FieldsArgs),
    /// Render a template from a template folder.
    Render(RenderArgs),
    /// Create the partials and cache directories of a template folder.
    Init(InitArgs),
}

impl Commands {
    pub fn verbose(&self) -> u8 {
        match self {
            Commands::Fields(args) => args.verbose,
            Commands::Render(args) => args.verbose,
            Commands::Init(args) => args.verbose,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FieldsArgs {
    /// Field set file (.json, .yaml or .yml).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory holding a formwork configuration file.
    #[arg(short, long, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Render unknown field types as text inputs.
    #[arg(long)]
    pub lenient: bool,

    /// Do not escape textarea content.
    #[arg(long = "raw-textarea")]
    pub raw_textarea: bool,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Template name, without the engine extension unless `--no-extension`.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Template folder (defaults to `engine.root_path` from the configuration).
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Templating syntax (defaults to the configuration, then mustache).
    #[arg(short, long, value_enum)]
    pub engine: Option<EngineArg>,

    /// Use NAME verbatim instead of appending the engine extension.
    #[arg(long = "no-extension")]
    pub no_extension: bool,

    /// Template context as a JSON object or `-` to read from stdin.
    #[arg(long)]
    pub context: Option<String>,

    /// Directory holding a formwork configuration file.
    #[arg(short, long, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Template folder.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse command line arguments, printing help when required inputs are missing.
pub fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument
            || e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
