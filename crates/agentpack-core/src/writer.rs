use crate::error::Result;
use crate::target::GeneratedFile;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting a host config directory.
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

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write every generated file under `out_root`, creating parent
/// directories as needed. Files carry no ordering dependencies, so the
/// list is written in the order given purely for predictable logs.
pub fn write_generated(files: &[GeneratedFile], out_root: &Path) -> Result<()> {
    for file in files {
        let mut path = out_root.to_path_buf();
        for seg in file.path.split('/') {
            path.push(seg);
        }
        atomic_write(&path, file.content.as_bytes())?;
        tracing::debug!(path = %path.display(), "wrote generated file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.md");
        atomic_write(&path, b"content").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/out.md");
        atomic_write(&path, b"data").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn atomic_write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.md");
        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn write_generated_places_files_under_root() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            GeneratedFile::new("agents/a.md", "A").unwrap(),
            GeneratedFile::new(".claude-plugin/plugin.json", "{}").unwrap(),
        ];
        write_generated(&files, dir.path()).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("agents/a.md")).unwrap(),
            "A"
        );
        assert!(dir.path().join(".claude-plugin/plugin.json").exists());
    }
}
