use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use url::Url;

use crate::constants::DEFAULT_DIR_MODE;
use crate::error::{Error, Result};

/// Matches a `scheme://` stream prefix such as `file://` or `s3://`.
static STREAM_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://").ok());

/// A directory location, either a plain filesystem path or a path behind a
/// stream wrapper (`scheme://path`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirTarget {
    /// Plain filesystem path
    Local(PathBuf),
    /// Path addressed through a stream wrapper
    Stream { scheme: String, path: String },
}

impl DirTarget {
    /// Parses a raw location, splitting off a stream wrapper when present and
    /// normalizing the remaining path (repeated slashes collapsed, trailing
    /// slash removed, empty path becomes `/`).
    pub fn parse(raw: &str) -> Self {
        match split_stream(raw) {
            Some((scheme, rest)) => DirTarget::Stream {
                scheme: scheme.to_ascii_lowercase(),
                path: normalize_path(rest),
            },
            None => DirTarget::Local(PathBuf::from(normalize_path(raw))),
        }
    }

    /// Resolves the target to a local path. Only `file://` streams map onto
    /// the local filesystem.
    pub fn into_local(self) -> Result<PathBuf> {
        match self {
            DirTarget::Local(path) => Ok(path),
            DirTarget::Stream { scheme, path } if scheme == "file" => {
                let url = Url::parse(&format!("file://{path}")).map_err(|e| {
                    Error::Other(anyhow::anyhow!("Invalid file URL 'file://{path}': {e}"))
                })?;
                url.to_file_path().map_err(|_| Error::UnsupportedStream { scheme })
            }
            DirTarget::Stream { scheme, .. } => Err(Error::UnsupportedStream { scheme }),
        }
    }
}

impl From<&str> for DirTarget {
    fn from(raw: &str) -> Self {
        DirTarget::parse(raw)
    }
}

impl From<&Path> for DirTarget {
    fn from(path: &Path) -> Self {
        DirTarget::Local(path.to_path_buf())
    }
}

impl From<PathBuf> for DirTarget {
    fn from(path: PathBuf) -> Self {
        DirTarget::Local(path)
    }
}

impl From<&PathBuf> for DirTarget {
    fn from(path: &PathBuf) -> Self {
        DirTarget::Local(path.clone())
    }
}

fn split_stream(raw: &str) -> Option<(&str, &str)> {
    let caps = STREAM_PREFIX.as_ref()?.captures(raw)?;
    let scheme = caps.get(1)?.as_str();
    let prefix_end = caps.get(0)?.end();
    Some((scheme, &raw[prefix_end..]))
}

fn normalize_path(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut previous_slash = false;
    for c in raw.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        normalized.push(c);
    }
    let trimmed = normalized.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Outcome of [`ensure_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    /// The path was already a directory.
    Existing,
    /// The path (and any missing parents) was created.
    Created,
    /// The path exists but is something other than a directory.
    NotADirectory,
}

impl DirStatus {
    /// Whether the path is usable as a directory.
    pub fn is_dir(&self) -> bool {
        !matches!(self, DirStatus::NotADirectory)
    }
}

/// Creates a directory and any missing parents, inheriting the permission
/// bits of the nearest existing ancestor.
///
/// The bits are re-applied to every created segment afterwards because the
/// process umask may strip them during creation. A directory that appears
/// while we are creating it (another process bootstrapping the same tree)
/// counts as success.
///
/// # Arguments
/// * `target` - Directory to create, a path or a `scheme://` location
///
/// # Returns
/// * `Result<DirStatus>` - Whether the directory existed or was created
pub fn ensure_directory(target: impl Into<DirTarget>) -> Result<DirStatus> {
    let path = target.into().into_local()?;

    if path.exists() {
        return Ok(if path.is_dir() { DirStatus::Existing } else { DirStatus::NotADirectory });
    }

    let missing: Vec<PathBuf> = path
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.is_dir())
        .map(Path::to_path_buf)
        .collect();
    let ancestor = match path.ancestors().nth(missing.len()) {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mode = inherited_mode(&ancestor);
    debug!(
        "Creating '{}' with mode {mode:o} inherited from '{}'",
        path.display(),
        ancestor.display()
    );

    if let Err(e) = create_dir_chain(&path, mode) {
        if path.is_dir() {
            debug!("'{}' was created concurrently", path.display());
            return Ok(DirStatus::Existing);
        }
        warn!("Failed to create '{}': {e}", path.display());
        return Err(Error::IoError(e));
    }

    for created in missing.iter().rev() {
        if let Err(e) = apply_mode(created, mode) {
            debug!("Could not re-apply mode {mode:o} to '{}': {e}", created.display());
        }
    }

    Ok(DirStatus::Created)
}

#[cfg(unix)]
fn inherited_mode(ancestor: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(ancestor)
        .map(|meta| meta.permissions().mode() & 0o7777)
        .unwrap_or(DEFAULT_DIR_MODE)
}

#[cfg(not(unix))]
fn inherited_mode(_ancestor: &Path) -> u32 {
    DEFAULT_DIR_MODE
}

#[cfg(unix)]
fn create_dir_chain(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(mode).create(path)
}

#[cfg(not(unix))]
fn create_dir_chain(path: &Path, _mode: u32) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

/// Parses a JSON object used as a template context. An empty buffer yields
/// an empty object.
pub fn parse_context(buf: &str) -> Result<serde_json::Value> {
    if buf.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    let value: serde_json::Value = serde_json::from_str(buf)?;
    if !value.is_object() {
        return Err(Error::ValidationError(
            "template context must be a JSON object".to_string(),
        ));
    }
    Ok(value)
}

pub fn read_from(mut reader: impl std::io::Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).map_err(Error::IoError)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_local_paths_and_normalizes_slashes() {
        assert_eq!(
            DirTarget::parse("/var//www/templates/"),
            DirTarget::Local(PathBuf::from("/var/www/templates"))
        );
        assert_eq!(DirTarget::parse(""), DirTarget::Local(PathBuf::from("/")));
    }

    #[test]
    fn parses_stream_wrappers() {
        assert_eq!(
            DirTarget::parse("S3://bucket//templates/"),
            DirTarget::Stream { scheme: "s3".into(), path: "bucket/templates".into() }
        );
    }

    #[test]
    fn file_stream_resolves_to_local_path() {
        let target = DirTarget::parse("file:///tmp/formwork");
        assert_eq!(target.into_local().unwrap(), PathBuf::from("/tmp/formwork"));
    }

    #[test]
    fn other_streams_are_unsupported() {
        let err = ensure_directory("s3://bucket/cache").unwrap_err();
        assert!(matches!(err, Error::UnsupportedStream { ref scheme } if scheme == "s3"));
    }

    #[test]
    fn existing_directory_is_reported() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(ensure_directory(tmp.path()).unwrap(), DirStatus::Existing);
    }

    #[test]
    fn existing_file_is_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("cache");
        fs::write(&file, "").unwrap();
        let status = ensure_directory(&file).unwrap();
        assert_eq!(status, DirStatus::NotADirectory);
        assert!(!status.is_dir());
    }

    #[test]
    fn creates_missing_chain() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("a/b/c");
        assert_eq!(ensure_directory(&target).unwrap(), DirStatus::Created);
        assert!(target.is_dir());
        assert_eq!(ensure_directory(&target).unwrap(), DirStatus::Existing);
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o7777
    }

    #[cfg(unix)]
    #[test]
    fn inherits_ancestor_mode_despite_umask() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("templates");
        fs::create_dir(&base).unwrap();
        fs::set_permissions(&base, fs::Permissions::from_mode(0o777)).unwrap();

        let target = base.join("partials/nested");
        ensure_directory(&target).unwrap();

        assert_eq!(mode_of(&base.join("partials")), 0o777);
        assert_eq!(mode_of(&target), 0o777);
    }

    #[cfg(unix)]
    #[test]
    fn repeated_calls_leave_same_mode() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("root");
        fs::create_dir(&base).unwrap();
        fs::set_permissions(&base, fs::Permissions::from_mode(0o750)).unwrap();

        let target = base.join("cache");
        ensure_directory(&target).unwrap();
        let once = mode_of(&target);
        ensure_directory(&target).unwrap();
        assert_eq!(mode_of(&target), once);
        assert_eq!(once, 0o750);
    }

    #[test]
    fn parse_context_accepts_objects_only() {
        assert_eq!(parse_context("").unwrap(), serde_json::json!({}));
        assert_eq!(
            parse_context(r#"{"name": "Ada"}"#).unwrap(),
            serde_json::json!({"name": "Ada"})
        );
        assert!(parse_context("[1, 2]").is_err());
        assert!(parse_context("{broken").is_err());
    }

    #[test]
    fn read_from_reads_everything() {
        let buf = read_from("hello".as_bytes()).unwrap();
        assert_eq!(buf, "hello");
    }
}
