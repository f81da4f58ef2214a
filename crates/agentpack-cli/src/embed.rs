use agentpack_core::error::{PackError, Result};
use agentpack_core::source::{SourceEntry, TemplateSource};
use rust_embed::Embed;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/templates"]
struct Templates;

/// The starter template tree bundled into the binary. Used when a project
/// has no `templates/` directory of its own, and by `--embedded` runs.
pub struct EmbeddedTemplates {
    project_root: PathBuf,
}

impl EmbeddedTemplates {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn read(&self, rel: &str) -> Result<String> {
        let Some(file) = <Templates as Embed>::get(rel) else {
            return Err(PackError::Read {
                path: rel.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no embedded asset"),
            });
        };
        String::from_utf8(file.data.to_vec()).map_err(|_| PackError::Read {
            path: rel.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "asset is not UTF-8"),
        })
    }

    fn exists(&self, rel: &str) -> bool {
        <Templates as Embed>::get(rel).is_some()
    }

    fn list_dir(&self, rel: &str) -> Vec<SourceEntry> {
        let prefix = if rel.is_empty() {
            String::new()
        } else {
            format!("{}/", rel.trim_matches('/'))
        };

        let mut dirs: BTreeSet<String> = BTreeSet::new();
        let mut files: BTreeSet<String> = BTreeSet::new();
        for path in Templates::iter() {
            let Some(rest) = path.strip_prefix(prefix.as_str()) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    dirs.insert(dir.to_string());
                }
                None => {
                    files.insert(rest.to_string());
                }
            }
        }

        let mut out: Vec<SourceEntry> = dirs
            .into_iter()
            .map(|name| SourceEntry { name, is_dir: true })
            .chain(files.into_iter().map(|name| SourceEntry {
                name,
                is_dir: false,
            }))
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn is_embedded(&self) -> bool {
        true
    }
}
