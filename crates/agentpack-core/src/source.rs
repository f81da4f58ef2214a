//! Template source capability.
//!
//! The compiler reads the canonical template tree through this trait so it
//! does not care whether templates live on disk (development) or are
//! bundled into the shipping binary. The embedded implementation lives in
//! the CLI crate next to the rust-embed asset declaration; core ships the
//! filesystem one.

use crate::error::{PackError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub is_dir: bool,
}

pub trait TemplateSource {
    /// Read the file at a template-relative, forward-slash path.
    fn read(&self, rel: &str) -> Result<String>;

    /// Whether a file exists at the given template-relative path.
    fn exists(&self, rel: &str) -> bool;

    /// List the immediate children of a template-relative directory,
    /// sorted ascending by name. A missing directory yields an empty list.
    fn list_dir(&self, rel: &str) -> Vec<SourceEntry>;

    /// Project root used to absolutize `./`-relative MCP arguments.
    fn project_root(&self) -> &Path;

    /// Whether this source is backed by embedded assets.
    fn is_embedded(&self) -> bool {
        false
    }
}

/// Read a file that is allowed to be absent. Absence is `Ok(None)`; any
/// other read failure is fatal.
pub fn read_optional(source: &dyn TemplateSource, rel: &str) -> Result<Option<String>> {
    if !source.exists(rel) {
        return Ok(None);
    }
    source.read(rel).map(Some)
}

// ---------------------------------------------------------------------------
// Filesystem source
// ---------------------------------------------------------------------------

pub struct FsSource {
    templates: PathBuf,
    project_root: PathBuf,
}

impl FsSource {
    /// A source rooted at `<project_root>/templates`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let templates = project_root.join("templates");
        Self {
            templates,
            project_root,
        }
    }

    /// A source with an explicit template directory.
    pub fn with_templates(project_root: impl Into<PathBuf>, templates: impl Into<PathBuf>) -> Self {
        Self {
            templates: templates.into(),
            project_root: project_root.into(),
        }
    }

    fn resolve(&self, rel: &str) -> PathBuf {
        let mut path = self.templates.clone();
        for seg in rel.split('/').filter(|s| !s.is_empty()) {
            path.push(seg);
        }
        path
    }
}

impl TemplateSource for FsSource {
    fn read(&self, rel: &str) -> Result<String> {
        let path = self.resolve(rel);
        std::fs::read_to_string(&path).map_err(|source| PackError::Read {
            path: path.display().to_string(),
            source,
        })
    }

    fn exists(&self, rel: &str) -> bool {
        self.resolve(rel).is_file()
    }

    fn list_dir(&self, rel: &str) -> Vec<SourceEntry> {
        let dir = self.resolve(rel);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut out: Vec<SourceEntry> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                let is_dir = e.file_type().ok()?.is_dir();
                Some(SourceEntry { name, is_dir })
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    fn project_root(&self) -> &Path {
        &self.project_root
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, FsSource) {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(templates.join("agents")).unwrap();
        std::fs::write(templates.join("agents/b.md"), "# B\n").unwrap();
        std::fs::write(templates.join("agents/a.md"), "# A\n").unwrap();
        std::fs::create_dir_all(templates.join("agents/nested")).unwrap();
        let source = FsSource::new(dir.path());
        (dir, source)
    }

    #[test]
    fn reads_relative_paths() {
        let (_dir, source) = fixture();
        assert_eq!(source.read("agents/a.md").unwrap(), "# A\n");
    }

    #[test]
    fn read_missing_is_error() {
        let (_dir, source) = fixture();
        assert!(source.read("agents/missing.md").is_err());
    }

    #[test]
    fn read_optional_absent_is_none() {
        let (_dir, source) = fixture();
        assert!(read_optional(&source, "agents/missing.md")
            .unwrap()
            .is_none());
        assert!(read_optional(&source, "agents/a.md").unwrap().is_some());
    }

    #[test]
    fn exists_is_files_only() {
        let (_dir, source) = fixture();
        assert!(source.exists("agents/a.md"));
        assert!(!source.exists("agents"));
        assert!(!source.exists("agents/nested"));
    }

    #[test]
    fn list_dir_sorted_with_kinds() {
        let (_dir, source) = fixture();
        let entries = source.list_dir("agents");
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md", "nested"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_dir);
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let (_dir, source) = fixture();
        assert!(source.list_dir("no-such-dir").is_empty());
    }
}
