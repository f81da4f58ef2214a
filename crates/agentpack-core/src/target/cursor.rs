//! Light-frontmatter, additive-merge target.
//!
//! This host accepts only a `description` in agent frontmatter, renders
//! rules as `.mdc` files with `alwaysApply: true`, and keeps hooks and
//! MCP servers in user-maintained config files the plugin must merge
//! into rather than overwrite.

use crate::config::TargetConfig;
use crate::error::Result;
use crate::mcp;
use crate::merge::JsonMergePayload;
use crate::paths::{
    self, prefixed, AGENTS_DIR, COMMANDS_DIR, CURSOR_RULE_EXT, PROTOCOLS_DIR, RULES_DIR,
    TARGET_CURSOR,
};
use crate::source::{read_optional, TemplateSource};
use crate::target::{
    collect_artifacts, named_hook_scripts, skill_files, ArtifactInput, GeneratedFile,
};
use crate::yaml::{self, Value};
use serde_json::json;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Protocol split constants
// ---------------------------------------------------------------------------

/// Protocols on this list are emitted as always-applied rules; everything
/// else ships as a reference document under `.agents/`.
const RULE_PROTOCOLS: &[&str] = &["memory-architecture"];

/// Literal sibling-document references rewritten when a protocol is
/// emitted as a rule, pointing readers at the reference-doc location.
const REFERENCE_REWRITES: &[(&str, &str)] = &[
    ("`session-protocol.md`", "`~/.agents/session-protocol.md`"),
    ("`task-protocol.md`", "`~/.agents/task-protocol.md`"),
];

// ---------------------------------------------------------------------------
// generate()
// ---------------------------------------------------------------------------

/// Compile the full GeneratedFile list for the light-frontmatter target.
pub fn generate(source: &dyn TemplateSource, config: &TargetConfig) -> Result<Vec<GeneratedFile>> {
    let mut files = Vec::new();
    emit_agents(source, config, &mut files)?;
    emit_skills(source, &mut files)?;
    emit_commands(source, &mut files)?;
    emit_protocols(source, &mut files)?;
    emit_instructions(source, &mut files)?;
    emit_hooks(source, config, &mut files)?;
    emit_mcp(source, &mut files)?;
    Ok(files)
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

fn emit_agents(
    source: &dyn TemplateSource,
    config: &TargetConfig,
    files: &mut Vec<GeneratedFile>,
) -> Result<()> {
    for input in collect_artifacts(source, AGENTS_DIR)? {
        let name = input.name().to_string();
        let Some(settings) = config.agent_settings(&name, TARGET_CURSOR) else {
            tracing::debug!(agent = %name, "not configured for cursor, skipped");
            continue;
        };
        let body = match &input {
            ArtifactInput::Single(a) => a.body.clone(),
            ArtifactInput::Composed { composable, .. } => {
                composable.compose(source, TARGET_CURSOR, &BTreeMap::new())?
            }
        };
        // This host understands nothing beyond a description.
        let fields = [(
            "description",
            Value::opt_str(settings.description.as_deref()),
        )];
        files.push(GeneratedFile::new(
            format!("{AGENTS_DIR}/{}.md", prefixed(&name)),
            yaml::wrap_frontmatter(&fields, &body),
        )?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Skills / commands
// ---------------------------------------------------------------------------

fn emit_skills(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    for (path, content) in skill_files(source)? {
        files.push(GeneratedFile::new(path, content)?);
    }
    Ok(())
}

fn emit_commands(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    for input in collect_artifacts(source, COMMANDS_DIR)? {
        let content = match &input {
            ArtifactInput::Single(a) => a.raw.clone(),
            ArtifactInput::Composed { composable, .. } => {
                composable.compose(source, TARGET_CURSOR, &BTreeMap::new())?
            }
        };
        files.push(GeneratedFile::new(
            format!("{COMMANDS_DIR}/{}.md", prefixed(input.name())),
            content,
        )?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Protocols: rules vs reference docs
// ---------------------------------------------------------------------------

fn emit_protocols(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    for protocol in crate::artifact::read_category(source, PROTOCOLS_DIR)? {
        if RULE_PROTOCOLS.contains(&protocol.name.as_str()) {
            let mut content = protocol.raw.clone();
            for (from, to) in REFERENCE_REWRITES {
                content = content.replace(from, to);
            }
            files.push(GeneratedFile::new(
                format!(
                    "{RULES_DIR}/{}.{CURSOR_RULE_EXT}",
                    prefixed(&protocol.name)
                ),
                yaml::wrap_frontmatter(&[("alwaysApply", Value::Bool(true))], &content),
            )?);
        } else {
            files.push(GeneratedFile::new(
                format!(".agents/{}.md", protocol.name),
                protocol.raw,
            )?);
        }
    }
    Ok(())
}

fn emit_instructions(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    let Some(composable) = crate::compose::Composable::load(source, RULES_DIR)? else {
        return Ok(());
    };
    let body = composable.compose(source, TARGET_CURSOR, &BTreeMap::new())?;
    files.push(GeneratedFile::new(
        format!("{RULES_DIR}/{}.{CURSOR_RULE_EXT}", prefixed("instructions")),
        body,
    )?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Hooks (additive)
// ---------------------------------------------------------------------------

fn emit_hooks(
    source: &dyn TemplateSource,
    config: &TargetConfig,
    files: &mut Vec<GeneratedFile>,
) -> Result<()> {
    let entries = config.hooks_for_target(TARGET_CURSOR);
    if entries.is_empty() {
        return Ok(());
    }

    // Base: the events of an optional target-specific source file.
    let mut events: serde_json::Map<String, serde_json::Value> = serde_json::Map::new();
    for (name, settings) in &entries {
        let Some(src) = &settings.source else {
            continue;
        };
        let text = match read_optional(source, src)? {
            Some(text) => Some(text),
            None => read_optional(source, &paths::join(paths::HOOKS_DIR, src))?,
        };
        let Some(text) = text else {
            tracing::debug!(hook = %name, source = %src, "hooks source absent");
            continue;
        };
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(doc) => {
                if let Some(base) = doc.get("hooks").and_then(|h| h.as_object()) {
                    events = base.clone();
                }
            }
            Err(err) => {
                tracing::warn!(hook = %name, source = %src, %err, "hooks source is not valid JSON, ignored");
            }
        }
        break;
    }

    // Inline registrations, grouped under their event.
    for (_, settings) in &entries {
        let Some(event) = &settings.event else {
            continue;
        };
        let mut registration = serde_json::Map::new();
        if let Some(matcher) = &settings.matcher {
            registration.insert("matcher".to_string(), json!(matcher));
        }
        if let Some(script) = &settings.script {
            registration.insert(
                "command".to_string(),
                json!(format!("{}/{script}", paths::HOOK_SCRIPTS_DIR)),
            );
        }
        if let Some(timeout) = settings.timeout {
            registration.insert("timeout".to_string(), json!(timeout));
        }
        let group = events.entry(event.clone()).or_insert_with(|| json!([]));
        match group.as_array_mut() {
            Some(arr) => arr.push(serde_json::Value::Object(registration)),
            // A malformed source file put a non-array here; replace it.
            None => *group = json!([serde_json::Value::Object(registration)]),
        }
    }

    if events.is_empty() {
        return Ok(());
    }

    let managed: Vec<String> = events.keys().map(|e| format!("hooks.{e}")).collect();
    let payload = JsonMergePayload::new(managed, json!({ "hooks": events }));
    files.push(GeneratedFile::new(
        "hooks/hooks.merge.json",
        payload.to_json_string(),
    )?);

    for (script, content) in named_hook_scripts(source, &entries)? {
        files.push(GeneratedFile::new(
            format!("{}/{script}", paths::HOOK_SCRIPTS_DIR),
            content,
        )?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MCP (additive)
// ---------------------------------------------------------------------------

fn emit_mcp(source: &dyn TemplateSource, files: &mut Vec<GeneratedFile>) -> Result<()> {
    let Some(doc) = mcp::load_canonical(source)? else {
        return Ok(());
    };
    let managed = mcp::managed_server_keys(&doc);
    if managed.is_empty() {
        tracing::warn!("canonical mcp.json has no mcpServers; nothing to merge");
        return Ok(());
    }
    // Only the server table is owned; anything else in the canonical file
    // stays out of the payload so the managed-key list is exhaustive.
    let content = json!({ "mcpServers": doc.get("mcpServers").cloned().unwrap_or(json!({})) });
    let payload = JsonMergePayload::new(managed, content);
    files.push(GeneratedFile::new(
        "mcp/mcp.merge.json",
        payload.to_json_string(),
    )?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
