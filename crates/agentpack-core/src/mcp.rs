//! Canonical MCP server wiring.
//!
//! The template tree carries one `configs/mcp.json` (older trees keep it
//! at the root as `mcp.json`) describing MCP servers in host-neutral
//! form. Server arguments that start with `./` are project-relative and
//! are rewritten to absolute paths at compile time so the host can launch
//! them from any working directory.

use crate::error::Result;
use crate::paths::{MCP_FILE, MCP_FILE_FALLBACK};
use crate::source::{read_optional, TemplateSource};
use serde_json::Value;
use std::path::Path;

/// Load the canonical MCP document with `./` arguments absolutized.
///
/// A missing file is `None`. An unparseable file is also `None`: the
/// target simply ships without MCP config and the author notices the gap.
pub fn load_canonical(source: &dyn TemplateSource) -> Result<Option<Value>> {
    let text = match read_optional(source, MCP_FILE)? {
        Some(text) => text,
        None => match read_optional(source, MCP_FILE_FALLBACK)? {
            Some(text) => text,
            None => return Ok(None),
        },
    };

    let mut doc: Value = match serde_json::from_str(&text) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(%err, "canonical mcp.json is not valid JSON; omitting MCP config");
            return Ok(None);
        }
    };

    absolutize_args(&mut doc, source.project_root());
    Ok(Some(doc))
}

/// Rewrite every server argument starting with `./` to an absolute path
/// under `project_root`. Other arguments are preserved unchanged.
pub fn absolutize_args(doc: &mut Value, project_root: &Path) {
    let Some(servers) = doc.get_mut("mcpServers").and_then(Value::as_object_mut) else {
        return;
    };
    for server in servers.values_mut() {
        let Some(args) = server.get_mut("args").and_then(Value::as_array_mut) else {
            continue;
        };
        for arg in args.iter_mut() {
            if let Some(rel) = arg.as_str().and_then(|s| s.strip_prefix("./")) {
                let abs = project_root.join(rel);
                *arg = Value::String(abs.to_string_lossy().into_owned());
            }
        }
    }
}

/// Two-space indented JSON with a trailing newline.
pub fn to_pretty(value: &Value) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}

/// Managed key paths for the additive target: one `mcpServers.<name>`
/// per server, sorted by server name.
pub fn managed_server_keys(doc: &Value) -> Vec<String> {
    let Some(servers) = doc.get("mcpServers").and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut keys: Vec<String> = servers
        .keys()
        .map(|name| format!("mcpServers.{name}"))
        .collect();
    keys.sort();
    keys
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
