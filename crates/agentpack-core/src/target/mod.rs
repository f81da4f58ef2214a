//! Target adapters.
//!
//! The two adapters share the leaves (readers, resolver, substitutor,
//! serializer, the walkers below) but keep their emission logic separate:
//! the output formats differ in frontmatter shape, overwrite-vs-merge
//! config style, and manifest presence, and a shared base would obscure
//! exactly the places the targets disagree.

pub mod claude;
pub mod cursor;

use crate::artifact::{self, CanonicalArtifact};
use crate::compose::Composable;
use crate::config::HookSettings;
use crate::error::{PackError, Result};
use crate::paths::{self, HOOK_SCRIPTS_DIR, SKILLS_DIR};
use crate::source::{read_optional, TemplateSource};

// ---------------------------------------------------------------------------
// GeneratedFile
// ---------------------------------------------------------------------------

/// One output file: a target-relative forward-slash path and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !paths::is_valid_output_path(&path) {
            return Err(PackError::InvalidOutputPath(path));
        }
        Ok(Self {
            path,
            content: content.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Artifact collection (agents, commands)
// ---------------------------------------------------------------------------

/// A canonical artifact as found in a category directory: either one
/// markdown file or a composable directory.
pub(crate) enum ArtifactInput {
    Single(CanonicalArtifact),
    Composed { name: String, composable: Composable },
}

impl ArtifactInput {
    pub(crate) fn name(&self) -> &str {
        match self {
            ArtifactInput::Single(a) => &a.name,
            ArtifactInput::Composed { name, .. } => name,
        }
    }
}

/// Collect the artifacts of a category directory, sorted by name.
///
/// A subdirectory is an artifact only when it carries `_order.yaml`.
/// When a composable directory and a single-file `.md` share a stem, the
/// composable wins and the single file is suppressed — one artifact must
/// never emit twice.
pub(crate) fn collect_artifacts(
    source: &dyn TemplateSource,
    dir: &str,
) -> Result<Vec<ArtifactInput>> {
    let mut composed: Vec<ArtifactInput> = Vec::new();
    let mut composed_names: Vec<String> = Vec::new();

    for entry in source.list_dir(dir) {
        if !entry.is_dir || artifact::is_skipped_entry(&entry.name) {
            continue;
        }
        let subdir = paths::join(dir, &entry.name);
        if let Some(composable) = Composable::load(source, &subdir)? {
            composed_names.push(entry.name.clone());
            composed.push(ArtifactInput::Composed {
                name: entry.name,
                composable,
            });
        }
    }

    let mut out: Vec<ArtifactInput> = artifact::read_category(source, dir)?
        .into_iter()
        .filter(|a| {
            if composed_names.iter().any(|n| n == &a.name) {
                tracing::debug!(artifact = %a.name, dir, "single-file sibling suppressed by composable");
                false
            } else {
                true
            }
        })
        .map(ArtifactInput::Single)
        .collect();
    out.extend(composed);
    out.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tree walkers (skills, hook scripts)
// ---------------------------------------------------------------------------

/// Recursively read every file under `dir`, returning `(relative path
/// under dir, content)` pairs sorted by path.
pub(crate) fn walk_files(source: &dyn TemplateSource, dir: &str) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    walk_into(source, dir, "", &mut out)?;
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

fn walk_into(
    source: &dyn TemplateSource,
    root: &str,
    rel: &str,
    out: &mut Vec<(String, String)>,
) -> Result<()> {
    let dir = paths::join(root, rel);
    for entry in source.list_dir(&dir) {
        if artifact::is_skipped_entry(&entry.name) {
            continue;
        }
        let child_rel = paths::join(rel, &entry.name);
        if entry.is_dir {
            walk_into(source, root, &child_rel, out)?;
        } else {
            let content = source.read(&paths::join(root, &child_rel))?;
            out.push((child_rel, content));
        }
    }
    Ok(())
}

/// Every skill tree's files with glyph-prefixed output paths. The paths
/// are identical for both targets; each adapter wraps them in its own
/// GeneratedFile list.
pub(crate) fn skill_files(source: &dyn TemplateSource) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for entry in source.list_dir(SKILLS_DIR) {
        if !entry.is_dir || artifact::is_skipped_entry(&entry.name) {
            continue;
        }
        let files = walk_files(source, &paths::join(SKILLS_DIR, &entry.name))?;
        for (rel, content) in files {
            out.push((
                format!("{}/{}/{}", SKILLS_DIR, paths::prefixed(&entry.name), rel),
                content,
            ));
        }
    }
    Ok(out)
}

/// Script files named by a target's hook entries, resolved under
/// `hooks/scripts/`, `(script name, content)`. A named script missing
/// from the tree is an optional input and is skipped.
pub(crate) fn named_hook_scripts(
    source: &dyn TemplateSource,
    entries: &[(&str, &HookSettings)],
) -> Result<Vec<(String, String)>> {
    let mut names: Vec<&str> = Vec::new();
    for (_, settings) in entries {
        names.extend(settings.scripts.iter().map(String::as_str));
        if let Some(script) = &settings.script {
            names.push(script);
        }
    }
    names.sort();
    names.dedup();

    let mut out = Vec::new();
    for name in names {
        let rel = paths::join(HOOK_SCRIPTS_DIR, name);
        match read_optional(source, &rel)? {
            Some(content) => out.push((name.to_string(), content)),
            None => tracing::debug!(script = name, "named hook script absent, skipped"),
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
