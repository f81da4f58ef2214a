//! The target configuration document (`agentpack.json`).
//!
//! A single JSON object enumerating, per target and per artifact, the
//! frontmatter fields, tool permissions, and visibility rules that differ
//! between hosts. Loaded once per compile; the compiler treats it as a
//! read-only value.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// AgentSettings
// ---------------------------------------------------------------------------

/// Per-(agent, target) emission settings. Any subset may be present; keys
/// absent here are absent from the emitted frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(
        default,
        rename = "argument-hint",
        skip_serializing_if = "Option::is_none"
    )]
    pub argument_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// HookSettings
// ---------------------------------------------------------------------------

/// Per-(hook, target) settings. Two shapes share this struct:
///
/// - overwrite-style: `source` names a hooks JSON file in the template
///   tree, `scripts` lists script files to install alongside it;
/// - additive-style: `event`/`matcher`/`timeout`/`script` describe one
///   inline registration grouped under its event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

// ---------------------------------------------------------------------------
// TargetConfig (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub version: String,

    /// Target-name → opaque host settings. The compiler does not inspect
    /// the values; the map's keys define which target names are known.
    #[serde(default)]
    pub targets: BTreeMap<String, serde_json::Value>,

    /// Agent-name → target-name → settings. An explicit JSON `null`
    /// deserializes to `Some(None)`: the author opted the agent out of
    /// that target. An absent key means not configured yet. Both skip.
    #[serde(default)]
    pub agents: BTreeMap<String, BTreeMap<String, Option<AgentSettings>>>,

    /// Hook-name → target-name → settings.
    #[serde(default)]
    pub hooks: BTreeMap<String, BTreeMap<String, HookSettings>>,

    // Reserved sections: tolerated, not yet interpreted.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub skills: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub protocols: BTreeMap<String, serde_json::Value>,
}

impl TargetConfig {
    /// Parse the configuration document. A JSON parse failure is fatal.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Settings for one (agent, target) pair. Returns `None` when the
    /// agent is absent, the target key is absent, or the value is an
    /// explicit null — all three mean "skip for this target".
    pub fn agent_settings(&self, agent: &str, target: &str) -> Option<&AgentSettings> {
        self.agents
            .get(agent)?
            .get(target)?
            .as_ref()
    }

    /// Whether an agent is configured (non-null) for at least one target.
    pub fn agent_has_any_target(&self, agent: &str) -> bool {
        self.agents
            .get(agent)
            .map(|targets| targets.values().any(|s| s.is_some()))
            .unwrap_or(false)
    }

    /// Hook entries configured for a target, ordered by hook name.
    pub fn hooks_for_target(&self, target: &str) -> Vec<(&str, &HookSettings)> {
        self.hooks
            .iter()
            .filter_map(|(name, targets)| {
                targets.get(target).map(|h| (name.as_str(), h))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
