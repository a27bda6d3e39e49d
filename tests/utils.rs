use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Writes `content` to `relative` under `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A template folder pre-populated with the given `(relative path, content)` files.
pub fn template_folder(files: &[(&str, &str)]) -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    for (relative, content) in files {
        write_file(tmp.path(), relative, content);
    }
    tmp
}
