use std::path::Path;

use crate::error::{Error, Result};

/// Extension trait for Path to provide convenient string conversion methods
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// # Examples
    /// ```
    /// use formwork::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("templates");
    /// assert_eq!(path.to_str_checked().unwrap(), "templates");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// Converts a path to a template name: forward slashes, no leading `./`.
    ///
    /// ```
    /// use formwork::ext::PathExt;
    /// use std::path::Path;
    ///
    /// assert_eq!(Path::new("./forms/login").to_template_name(), "forms/login");
    /// ```
    fn to_template_name(&self) -> String;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn to_template_name(&self) -> String {
        let name = self.to_string_lossy().replace('\\', "/");
        name.trim_start_matches("./").to_string()
    }
}
