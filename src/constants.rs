//! Constants used throughout formwork

/// Configuration file names in order of preference
pub const CONFIG_FILENAMES: &[&str] =
    &["formwork.json", "formwork.yaml", "formwork.yml"];

/// Markup returned in place of a template that does not exist.
pub const MISSING_TEMPLATE_PLACEHOLDER: &str = "<strong>Not it!</strong>";

/// Subdirectory of the template root holding partials
pub const PARTIALS_DIR: &str = "partials";

/// Subdirectory of the template root holding compiled templates
pub const CACHE_DIR: &str = "cache";

/// Permission bits used when no existing ancestor can be inspected
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Field type names and their accepted synonyms
pub mod field_types {
    pub const TEXT: &str = "text";
    pub const HIDDEN: &str = "hidden";
    pub const CHECKBOX: &str = "checkbox";
    pub const CHECKBOX_SYNONYM: &str = "check";
    pub const RADIO: &str = "radio";
    pub const RADIO_SYNONYM: &str = "radiobutton";
    pub const SELECT: &str = "select";
    pub const TEXTAREA: &str = "textarea";
}

/// Exit codes
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
