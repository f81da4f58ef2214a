pub mod check;
pub mod compile;
pub mod install;

use crate::embed::EmbeddedTemplates;
use agentpack_core::config::TargetConfig;
use agentpack_core::paths::CONFIG_FILE;
use agentpack_core::source::{FsSource, TemplateSource};
use anyhow::Context;
use std::path::Path;

/// Build the template source and configuration for a run.
///
/// Filesystem mode reads `<root>/templates` and `<root>/agentpack.json`.
/// Embedded mode uses the bundled starter tree; a project-level
/// `agentpack.json` still wins over the bundled default when present.
pub fn load_inputs(
    root: &Path,
    embedded: bool,
) -> anyhow::Result<(Box<dyn TemplateSource>, TargetConfig)> {
    let config_path = root.join(CONFIG_FILE);

    if embedded {
        let source = EmbeddedTemplates::new(root);
        let config = if config_path.is_file() {
            TargetConfig::load(&config_path)
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        } else {
            let text = source
                .read(CONFIG_FILE)
                .context("embedded default agentpack.json missing")?;
            TargetConfig::from_json_str(&text).context("embedded agentpack.json is invalid")?
        };
        return Ok((Box::new(source), config));
    }

    let config = TargetConfig::load(&config_path).with_context(|| {
        format!(
            "failed to load {}; create it or run with --embedded",
            config_path.display()
        )
    })?;
    Ok((Box::new(FsSource::new(root)), config))
}
