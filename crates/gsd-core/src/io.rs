use crate::error::Result;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Readers never observe a partially written artifact.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a file as UTF-8, treating any failure as absence.
pub fn read_lenient(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "unreadable artifact treated as absent");
            }
            None
        }
    }
}

/// File names directly under `dir`. A missing or unreadable directory yields
/// an empty set.
pub fn list_names(dir: &Path) -> BTreeSet<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return BTreeSet::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect()
}

/// True when `dir` exists and holds at least one entry.
pub fn dir_has_entries(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/PROJECT.md");
        atomic_write(&path, b"# Project\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Project\n");
    }

    #[test]
    fn read_lenient_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_lenient(&dir.path().join("nope.md")).is_none());
    }

    #[test]
    fn list_names_of_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_names(&dir.path().join("missing")).is_empty());
        assert!(!dir_has_entries(&dir.path().join("missing")));
    }

    #[test]
    fn list_names_returns_file_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("PROJECT.md"), "x").unwrap();
        std::fs::write(dir.path().join("PROJECT-PLAN.md"), "y").unwrap();
        let names = list_names(dir.path());
        assert!(names.contains("PROJECT.md"));
        assert!(names.contains("PROJECT-PLAN.md"));
        assert!(dir_has_entries(dir.path()));
    }
}
