//! Long-form agent target.
//!
//! This host supports rich per-agent frontmatter, file-backed skills,
//! prefixed slash-commands, a rules directory for protocol documents,
//! overwrite-style hooks and MCP config files, and a plugin manifest.

use crate::config::{AgentSettings, TargetConfig};
use crate::error::Result;
use crate::mcp;
use crate::paths::{
    self, prefixed, AGENTS_DIR, COMMANDS_DIR, PROTOCOLS_DIR, RULES_DIR, TARGET_CLAUDE,
};
use crate::source::{read_optional, TemplateSource};
use crate::target::{
    collect_artifacts, named_hook_scripts, skill_files, ArtifactInput, GeneratedFile,
};
use crate::yaml::{self, Value};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Plugin manifest constants
// ---------------------------------------------------------------------------

const PLUGIN_DESCRIPTION: &str = "Agents, skills, commands, and rules compiled by agentpack";
const PLUGIN_AUTHOR: &str = "agentpack";

// ---------------------------------------------------------------------------
// generate()
// ---------------------------------------------------------------------------

/// Compile the full GeneratedFile list for the long-form target.
pub fn generate(source: &dyn TemplateSource, config: &TargetConfig) -> Result<Vec<GeneratedFile>> {
    let mut files = Vec::new();
    emit_agents(source, config, &mut files)?;
    emit_skills(source, &mut files)?;
    emit_commands(source, &mut files)?;
    emit_rules(source, &mut files)?;
    emit_instructions(source, &mut files)?;
    emit_hooks(source, config, &mut files)?;
    emit_mcp(source, &mut files)?;
    files.push(plugin_manifest()?);
    Ok(files)
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Frontmatter fields in the canonical key order this host requires.
/// `name` is always present; the rest only when configured.
fn agent_frontmatter(name: &str, s: &AgentSettings) -> Vec<(&'static str, Value)> {
    vec![
        ("name", Value::str(prefixed(name))),
        ("model", Value::opt_str(s.model.as_deref())),
        ("description", Value::opt_str(s.description.as_deref())),
        ("memory", Value::opt_str(s.memory.as_deref())),
        ("color", Value::opt_str(s.color.as_deref())),
        ("argument-hint", Value::opt_str(s.argument_hint.as_deref())),
        ("tools", Value::opt_list(s.tools.as_deref())),
        ("skills", Value::opt_list(s.skills.as_deref())),
    ]
}

fn emit_agents(
    source: &dyn TemplateSource,
    config: &TargetConfig,
    files: &mut Vec<GeneratedFile>,
) -> Result<()> {
    for input in collect_artifacts(source, AGENTS_DIR)? {
        let name = input.name().to_string();
        let Some(settings) = config.agent_settings(&name, TARGET_CLAUDE) else {
            tracing::debug!(agent = %name, "not configured for claude, skipped");
            continue;
        };
        let body = match &input {
            ArtifactInput::Single(a) => a.body.clone(),
            ArtifactInput::Composed { composable, .. } => {
                composable.compose(source, TARGET_CLAUDE, &BTreeMap::new())?
            }
        };
        let content = yaml::wrap_frontmatter(&agent_frontmatter(&name, settings), &body);
        files.push(GeneratedFile::new(
            format!("{AGENTS_DIR}/{}.md", prefixed(&name)),
            content,
        )?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Skills / commands / rules
// ---------------------------------------------------------------------------

fn emit_skills(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    for (path, content) in skill_files(source)? {
        files.push(GeneratedFile::new(path, content)?);
    }
    Ok(())
}

fn emit_commands(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    for input in collect_artifacts(source, COMMANDS_DIR)? {
        // Commands carry no injected frontmatter on any target.
        let content = match &input {
            ArtifactInput::Single(a) => a.raw.clone(),
            ArtifactInput::Composed { composable, .. } => {
                composable.compose(source, TARGET_CLAUDE, &BTreeMap::new())?
            }
        };
        files.push(GeneratedFile::new(
            format!("{COMMANDS_DIR}/{}.md", prefixed(input.name())),
            content,
        )?);
    }
    Ok(())
}

fn emit_rules(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    for protocol in crate::artifact::read_category(source, PROTOCOLS_DIR)? {
        files.push(GeneratedFile::new(
            format!("{RULES_DIR}/{}.md", prefixed(&protocol.name)),
            protocol.raw,
        )?);
    }
    Ok(())
}

/// The composable top-level instructions document, when the template tree
/// carries one. No injected frontmatter.
fn emit_instructions(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    let Some(composable) = crate::compose::Composable::load(source, RULES_DIR)? else {
        return Ok(());
    };
    let body = composable.compose(source, TARGET_CLAUDE, &BTreeMap::new())?;
    files.push(GeneratedFile::new(
        format!("{RULES_DIR}/{}.md", prefixed("instructions")),
        body,
    )?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Hooks (overwrite-style)
// ---------------------------------------------------------------------------

fn emit_hooks(
    source: &dyn TemplateSource,
    config: &TargetConfig,
    files: &mut Vec<GeneratedFile>,
) -> Result<()> {
    let entries = config.hooks_for_target(TARGET_CLAUDE);
    if entries.is_empty() {
        return Ok(());
    }

    for (name, settings) in &entries {
        let Some(src) = &settings.source else {
            continue;
        };
        // The source is accepted template-root-relative, with a hooks/
        // fallback for trees that name the bare file.
        let text = match read_optional(source, src)? {
            Some(text) => Some(text),
            None => read_optional(source, &paths::join(paths::HOOKS_DIR, src))?,
        };
        let Some(text) = text else {
            tracing::debug!(hook = %name, source = %src, "hooks source absent, nothing emitted");
            continue;
        };
        if serde_json::from_str::<serde_json::Value>(&text).is_err() {
            tracing::warn!(hook = %name, source = %src, "hooks source is not valid JSON, nothing emitted");
            continue;
        }
        files.push(GeneratedFile::new("hooks/hooks.json", text)?);
        break; // one overwrite-style file per target
    }

    for (script, content) in named_hook_scripts(source, &entries)? {
        files.push(GeneratedFile::new(
            format!("{}/{script}", paths::HOOK_SCRIPTS_DIR),
            content,
        )?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MCP / manifest
// ---------------------------------------------------------------------------

fn emit_mcp(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    if let Some(doc) = mcp::load_canonical(source)? {
        files.push(GeneratedFile::new(".mcp.json", mcp::to_pretty(&doc))?);
    }
    Ok(())
}

fn plugin_manifest() -> Result<GeneratedFile> {
    let manifest = serde_json::json!({
        "name": paths::GLYPH,
        "description": PLUGIN_DESCRIPTION,
        "author": {"name": PLUGIN_AUTHOR},
    });
    GeneratedFile::new(".claude-plugin/plugin.json", mcp::to_pretty(&manifest))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
