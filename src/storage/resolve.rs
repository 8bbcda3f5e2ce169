//
//  resolve.rs
//  filedb
//
//  Created by the filedb team
//

//! Path resolution for resources and collections.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Append `.ext` to a path without touching any dots already in the name.
pub fn with_ext(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

/// Stat `path`, falling back to `path.<ext>` when the bare path is missing.
///
/// This lets callers address a collection directory and a record file the
/// same way. Errors other than "not found" on the bare path are returned
/// as-is; the fallback's error is returned when both are missing.
pub fn stat(path: &Path, ext: &str) -> io::Result<Metadata> {
    locate(path, ext).map(|(_, meta)| meta)
}

/// Like [`stat`], but also returns which of the two candidates exists.
pub fn locate(path: &Path, ext: &str) -> io::Result<(PathBuf, Metadata)> {
    match fs::metadata(path) {
        Ok(meta) => Ok((path.to_path_buf(), meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let qualified = with_ext(path, ext);
            let meta = fs::metadata(&qualified)?;
            Ok((qualified, meta))
        }
        Err(e) => Err(e),
    }
}

/// Lexically clean a path: drop `.` components, fold `..` into the previous
/// component where possible and strip trailing separators.
///
/// An empty result becomes `.`. The filesystem is not consulted, so
/// symlinks are not resolved.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stat_bare_then_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Ali.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let file = stat(&dir.path().join("Ali"), "json").unwrap();
        assert!(file.is_file());

        let nested = stat(&dir.path().join("nested"), "json").unwrap();
        assert!(nested.is_dir());

        let (found, _) = locate(&dir.path().join("Ali"), "json").unwrap();
        assert_eq!(found, dir.path().join("Ali.json"));

        let missing = stat(&dir.path().join("Nobody"), "json").unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_with_ext_keeps_existing_dots() {
        assert_eq!(
            with_ext(Path::new("users/v1.2"), "json"),
            PathBuf::from("users/v1.2.json")
        );
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Path::new("./data/")), PathBuf::from("data"));
        assert_eq!(clean(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(clean(Path::new("")), PathBuf::from("."));
        assert_eq!(clean(Path::new("./")), PathBuf::from("."));
        assert_eq!(clean(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(clean(Path::new("/../x")), PathBuf::from("/x"));
    }
}
