//! Composable artifacts.
//!
//! A composable artifact is a directory containing `_order.yaml` (ordered
//! section paths, optionally carrying the `{tool}` token resolved per
//! target), an optional `_variables.yaml` (target-name → variable map),
//! and section files split between a shared `sections/` area and
//! per-target variant subdirectories. The resolver assembles one
//! concatenated, substituted body per target.

use crate::error::{PackError, Result};
use crate::paths::{self, ORDER_FILE, TOOL_TOKEN, VARIABLES_FILE};
use crate::source::{read_optional, TemplateSource};
use crate::subst::substitute;
use crate::yaml;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Composable {
    /// Template-relative directory of the artifact.
    pub dir: String,
    /// Section paths in emission order, unresolved (`{tool}` intact).
    pub sections: Vec<String>,
    /// Target-name → variable-name → value.
    pub variables: BTreeMap<String, BTreeMap<String, String>>,
}

impl Composable {
    /// Load the composable artifact rooted at `dir`, or `None` when the
    /// directory has no `_order.yaml` — the sentinel file is the only
    /// signal consulted.
    pub fn load(source: &dyn TemplateSource, dir: &str) -> Result<Option<Self>> {
        let order_path = paths::join(dir, ORDER_FILE);
        let Some(order_text) = read_optional(source, &order_path)? else {
            return Ok(None);
        };
        let sections = yaml::parse_list(&order_text);

        let variables = match read_optional(source, &paths::join(dir, VARIABLES_FILE))? {
            Some(text) => parse_variables(&text),
            None => BTreeMap::new(),
        };

        Ok(Some(Self {
            dir: dir.to_string(),
            sections,
            variables,
        }))
    }

    /// The variable map for one target; empty when the target has none.
    pub fn variables_for(&self, target: &str) -> BTreeMap<String, String> {
        self.variables.get(target).cloned().unwrap_or_default()
    }

    /// Compose the artifact body for `target`.
    ///
    /// Sections are resolved in `_order.yaml` order: the `{tool}` token in
    /// an entry path becomes the target name, the file is read, variables
    /// are substituted (extras win over the target's map), trailing
    /// newlines are trimmed, and non-empty sections are joined with one
    /// blank line. The result carries a single trailing newline.
    ///
    /// A missing file behind a `{tool}` entry is skipped — variant
    /// sections are optional. A missing shared section is a malformed
    /// template tree and fails the composition.
    pub fn compose(
        &self,
        source: &dyn TemplateSource,
        target: &str,
        extra: &BTreeMap<String, String>,
    ) -> Result<String> {
        let mut vars = self.variables_for(target);
        for (k, v) in extra {
            vars.insert(k.clone(), v.clone());
        }

        let mut parts: Vec<String> = Vec::new();
        for entry in &self.sections {
            let resolved = entry.replace(TOOL_TOKEN, target);
            let rel = paths::join(&self.dir, &resolved);
            if !source.exists(&rel) {
                if entry.contains(TOOL_TOKEN) {
                    tracing::debug!(artifact = %self.dir, section = %entry, for_target = target, "variant section absent, skipped");
                    continue;
                }
                return Err(PackError::MissingSection {
                    artifact: self.dir.clone(),
                    section: entry.clone(),
                });
            }
            let text = source.read(&rel)?;
            let text = substitute(&text, &vars);
            let trimmed = text.trim_end();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }

        let mut body = parts.join("\n\n");
        body.push('\n');
        Ok(body)
    }
}

/// `_variables.yaml` is a mapping of target names to one-level maps.
/// Non-map values are dropped (best-effort parsing, same as everywhere).
fn parse_variables(text: &str) -> BTreeMap<String, BTreeMap<String, String>> {
    yaml::parse_mapping(text)
        .into_iter()
        .filter_map(|(target, value)| match value {
            yaml::Value::Map(m) => Some((target, m)),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FsSource;
    use tempfile::TempDir;

    fn fixture(files: &[(&str, &str)]) -> (TempDir, FsSource) {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join("templates").join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        let source = FsSource::new(dir.path());
        (dir, source)
    }

    fn orchestrator_fixture() -> (TempDir, FsSource) {
        fixture(&[
            (
                "agents/orchestrator/_order.yaml",
                "- sections/010-header.md\n- {tool}/020-identity.md\n- sections/030-shared.md\n",
            ),
            (
                "agents/orchestrator/_variables.yaml",
                "claude:\n  worker: teammate\n  tool_name: \"Long Form\"\ncursor:\n  worker: agent\n  tool_name: Light\n",
            ),
            ("agents/orchestrator/sections/010-header.md", "# {tool_name} system\n"),
            ("agents/orchestrator/sections/030-shared.md", "Spawn a {worker}.\n"),
            ("agents/orchestrator/claude/020-identity.md", "You are the Team Lead.\n"),
            ("agents/orchestrator/cursor/020-identity.md", "You are the Orchestrator.\n"),
        ])
    }

    #[test]
    fn load_requires_order_sentinel() {
        let (_dir, source) = fixture(&[("agents/plain/readme.md", "# no order file\n")]);
        assert!(Composable::load(&source, "agents/plain").unwrap().is_none());
    }

    #[test]
    fn load_reads_order_and_variables() {
        let (_dir, source) = orchestrator_fixture();
        let c = Composable::load(&source, "agents/orchestrator")
            .unwrap()
            .unwrap();
        assert_eq!(c.sections.len(), 3);
        assert_eq!(
            c.variables_for("claude").get("worker").map(String::as_str),
            Some("teammate")
        );
        assert!(c.variables_for("unknown-target").is_empty());
    }

    #[test]
    fn missing_variables_file_is_empty_map() {
        let (_dir, source) = fixture(&[
            ("agents/x/_order.yaml", "- sections/a.md\n"),
            ("agents/x/sections/a.md", "A\n"),
        ]);
        let c = Composable::load(&source, "agents/x").unwrap().unwrap();
        assert!(c.variables.is_empty());
        assert_eq!(c.compose(&source, "claude", &BTreeMap::new()).unwrap(), "A\n");
    }

    #[test]
    fn composes_in_order_with_blank_line_joins() {
        let (_dir, source) = orchestrator_fixture();
        let c = Composable::load(&source, "agents/orchestrator")
            .unwrap()
            .unwrap();
        let body = c.compose(&source, "claude", &BTreeMap::new()).unwrap();
        assert_eq!(
            body,
            "# Long Form system\n\nYou are the Team Lead.\n\nSpawn a teammate.\n"
        );
    }

    #[test]
    fn variant_resolution_differs_per_target() {
        let (_dir, source) = orchestrator_fixture();
        let c = Composable::load(&source, "agents/orchestrator")
            .unwrap()
            .unwrap();
        let body = c.compose(&source, "cursor", &BTreeMap::new()).unwrap();
        assert_eq!(
            body,
            "# Light system\n\nYou are the Orchestrator.\n\nSpawn a agent.\n"
        );
    }

    #[test]
    fn missing_variant_section_is_skipped() {
        let (dir, source) = orchestrator_fixture();
        std::fs::remove_file(
            dir.path()
                .join("templates/agents/orchestrator/cursor/020-identity.md"),
        )
        .unwrap();
        let c = Composable::load(&source, "agents/orchestrator")
            .unwrap()
            .unwrap();
        let body = c.compose(&source, "cursor", &BTreeMap::new()).unwrap();
        assert_eq!(body, "# Light system\n\nSpawn a agent.\n");
    }

    #[test]
    fn missing_shared_section_is_fatal() {
        let (dir, source) = orchestrator_fixture();
        std::fs::remove_file(
            dir.path()
                .join("templates/agents/orchestrator/sections/030-shared.md"),
        )
        .unwrap();
        let c = Composable::load(&source, "agents/orchestrator")
            .unwrap()
            .unwrap();
        let err = c.compose(&source, "claude", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, PackError::MissingSection { .. }));
    }

    #[test]
    fn extra_variables_win() {
        let (_dir, source) = orchestrator_fixture();
        let c = Composable::load(&source, "agents/orchestrator")
            .unwrap()
            .unwrap();
        let extra: BTreeMap<String, String> =
            [("worker".to_string(), "drone".to_string())].into();
        let body = c.compose(&source, "claude", &extra).unwrap();
        assert!(body.contains("Spawn a drone."));
    }

    #[test]
    fn shared_only_order_is_target_independent() {
        let (_dir, source) = fixture(&[
            ("commands/run/_order.yaml", "- sections/a.md\n- sections/b.md\n"),
            ("commands/run/sections/a.md", "First.\n"),
            ("commands/run/sections/b.md", "Second.\n"),
        ]);
        let c = Composable::load(&source, "commands/run").unwrap().unwrap();
        let claude = c.compose(&source, "claude", &BTreeMap::new()).unwrap();
        let cursor = c.compose(&source, "cursor", &BTreeMap::new()).unwrap();
        assert_eq!(claude, cursor);
        assert_eq!(claude, "First.\n\nSecond.\n");
    }

    #[test]
    fn empty_sections_are_dropped_from_join() {
        let (_dir, source) = fixture(&[
            ("agents/x/_order.yaml", "- sections/a.md\n- sections/empty.md\n- sections/b.md\n"),
            ("agents/x/sections/a.md", "A\n"),
            ("agents/x/sections/empty.md", "\n\n"),
            ("agents/x/sections/b.md", "B\n"),
        ]);
        let c = Composable::load(&source, "agents/x").unwrap().unwrap();
        let body = c.compose(&source, "claude", &BTreeMap::new()).unwrap();
        assert_eq!(body, "A\n\nB\n");
    }

    #[test]
    fn malformed_order_lines_are_dropped() {
        let (_dir, source) = fixture(&[
            ("agents/x/_order.yaml", "- sections/a.md\ngarbage line\n"),
            ("agents/x/sections/a.md", "A\n"),
        ]);
        let c = Composable::load(&source, "agents/x").unwrap().unwrap();
        assert_eq!(c.sections, vec!["sections/a.md"]);
    }

    #[test]
    fn unknown_placeholders_survive_composition() {
        let (_dir, source) = fixture(&[
            ("agents/x/_order.yaml", "- sections/a.md\n"),
            ("agents/x/sections/a.md", "Value of {unset} stays.\n"),
        ]);
        let c = Composable::load(&source, "agents/x").unwrap().unwrap();
        let body = c.compose(&source, "claude", &BTreeMap::new()).unwrap();
        assert_eq!(body, "Value of {unset} stays.\n");
    }
}
