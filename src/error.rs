use thiserror::Error;

/// Broad classes of failure, used by callers to decide between aborting
/// and degrading a single field or template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad construction input, such as a missing template root.
    Configuration,
    /// Filesystem failure while bootstrapping directories or reading files.
    Io,
    /// Malformed field descriptor.
    Validation,
    /// A requested template file does not exist.
    NotFound,
    /// The templating engine rejected or failed to render a template.
    Render,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Cannot proceed: template directory '{template_dir}' does not exist.")]
    TemplateRootMissing { template_dir: String },

    #[error("No template directory given. Pass --root or set engine.root_path in the configuration.")]
    NoTemplateRoot,

    #[error("Cannot write in the template directory '{path}'. Check for permissions.")]
    DirectoryCreationError { path: String },

    #[error("Path '{path}' exists but is not a directory.")]
    NotADirectory { path: String },

    #[error("Stream wrapper '{scheme}://' is not supported for directory creation.")]
    UnsupportedStream { scheme: String },

    #[error("Unknown engine kind '{kind}'. Expected one of: mustache, twig.")]
    UnknownEngineKind { kind: String },

    #[error("No configuration file found in '{config_dir}'. Tried: {config_files}.")]
    ConfigNotFound { config_dir: String, config_files: String },

    #[error("Failed to parse config file '{path}'.")]
    ConfigParseError { path: String },

    /// Represents validation failures in field descriptors
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// A select field was given no options to render.
    #[error("Field '{name}' has no valid options.")]
    MissingOptions { name: String },

    #[error("Field '{name}' has unknown type '{type_name}'.")]
    UnknownFieldType { name: String, type_name: String },

    #[error("Template '{path}' not found.")]
    TemplateNotFound { path: String },

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Failed to render. Original error: {0}")]
    MustacheError(#[from] mustache::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TemplateRootMissing { .. }
            | Error::NoTemplateRoot
            | Error::UnknownEngineKind { .. }
            | Error::ConfigNotFound { .. }
            | Error::ConfigParseError { .. }
            | Error::UnsupportedStream { .. }
            | Error::JsonError(_)
            | Error::YamlError(_)
            | Error::Other(_) => ErrorKind::Configuration,
            Error::IoError(_)
            | Error::DirectoryCreationError { .. }
            | Error::NotADirectory { .. } => ErrorKind::Io,
            Error::ValidationError(_)
            | Error::MissingOptions { .. }
            | Error::UnknownFieldType { .. } => ErrorKind::Validation,
            Error::TemplateNotFound { .. } => ErrorKind::NotFound,
            Error::MinijinjaError(_)
            | Error::MustacheError(_) => ErrorKind::Render,
        }
    }
}

/// Convenience type alias for Results with formwork's Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
