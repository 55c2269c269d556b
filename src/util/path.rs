use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `base` and normalise it lexically.
///
/// `.` components are dropped and `..` pops the previous component. Symlinks
/// are not resolved and the path does not need to exist.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root
                if normalized.parent().is_some() {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path as stored in the resolve table.
pub fn to_store_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
