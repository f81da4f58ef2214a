//! Canonical single-file artifacts.
//!
//! A canonical artifact is one markdown file in a category directory
//! (`agents/`, `commands/`, `protocols/`). Its category comes from the
//! directory it was read from, never from its content.

use crate::error::Result;
use crate::source::TemplateSource;
use crate::yaml::{self, Mapping};

#[derive(Debug, Clone)]
pub struct CanonicalArtifact {
    /// Filename stem (no extension, no directory).
    pub name: String,
    pub frontmatter: Mapping,
    pub body: String,
    /// Original file content, for categories emitted verbatim.
    pub raw: String,
}

impl CanonicalArtifact {
    pub fn parse(name: impl Into<String>, content: &str) -> Self {
        let (frontmatter, body) = yaml::split_frontmatter(content);
        Self {
            name: name.into(),
            frontmatter,
            body,
            raw: content.to_string(),
        }
    }
}

/// Whether a directory entry is skipped by every category reader.
pub fn is_skipped_entry(name: &str) -> bool {
    name.starts_with('.') || name == ".gitkeep" || name == ".DS_Store"
}

/// Enumerate the markdown files of a category directory, sorted by
/// filename ascending. Subdirectories, dotfiles, and non-`.md` files are
/// skipped. A missing directory yields an empty list; an unreadable file
/// aborts the compile.
pub fn read_category(source: &dyn TemplateSource, dir: &str) -> Result<Vec<CanonicalArtifact>> {
    let mut out = Vec::new();
    for entry in source.list_dir(dir) {
        if entry.is_dir || is_skipped_entry(&entry.name) {
            continue;
        }
        let Some(stem) = entry.name.strip_suffix(".md") else {
            continue;
        };
        let content = source.read(&crate::paths::join(dir, &entry.name))?;
        out.push(CanonicalArtifact::parse(stem, &content));
    }
    Ok(out)
}
