use crate::output::print_json;
use agentpack_core::paths::{AGENTS_DIR, HOOKS_DIR, MCP_FILE, MCP_FILE_FALLBACK, ORDER_FILE};
use agentpack_core::source::{read_optional, TemplateSource};
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum WarnLevel {
    Warning,
    Error,
}

#[derive(Debug, Serialize)]
struct CheckWarning {
    level: WarnLevel,
    message: String,
}

/// Lint the template tree against the configuration. Everything compile
/// tolerates silently is reported here so authors can see what a target
/// will quietly go without; only conditions compile itself rejects fail
/// the check.
pub fn run(root: &Path, embedded: bool, json: bool) -> anyhow::Result<()> {
    let (source, config) = super::load_inputs(root, embedded)?;
    let mut warnings: Vec<CheckWarning> = Vec::new();

    let known_targets: BTreeSet<&str> = config.targets.keys().map(String::as_str).collect();

    // Agents configured but absent from the tree, bad names, unknown targets.
    for (agent, targets) in &config.agents {
        if agentpack_core::paths::validate_name(agent).is_err() {
            warnings.push(CheckWarning {
                level: WarnLevel::Error,
                message: format!(
                    "agent name '{agent}' is invalid (lowercase alphanumeric with hyphens)"
                ),
            });
        }
        let single = format!("{AGENTS_DIR}/{agent}.md");
        let composable = format!("{AGENTS_DIR}/{agent}/{ORDER_FILE}");
        if !source.exists(&single) && !source.exists(&composable) {
            warnings.push(CheckWarning {
                level: WarnLevel::Error,
                message: format!("agent '{agent}' is configured but has no template"),
            });
        }
        if !known_targets.is_empty() {
            for target in targets.keys() {
                if !known_targets.contains(target.as_str()) {
                    warnings.push(CheckWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "agent '{agent}' references unknown target '{target}'"
                        ),
                    });
                }
            }
        }
    }

    // Agents in the tree not configured for any target.
    for entry in source.list_dir(AGENTS_DIR) {
        let name = if entry.is_dir {
            if !source.exists(&format!("{AGENTS_DIR}/{}/{ORDER_FILE}", entry.name)) {
                continue;
            }
            entry.name.clone()
        } else {
            match entry.name.strip_suffix(".md") {
                Some(stem) if !stem.starts_with('.') => stem.to_string(),
                _ => continue,
            }
        };
        if !config.agent_has_any_target(&name) {
            warnings.push(CheckWarning {
                level: WarnLevel::Warning,
                message: format!("agent '{name}' exists in the tree but no target emits it"),
            });
        }
    }

    // Hook sources that are missing or unparseable, and unknown targets.
    for (hook, targets) in &config.hooks {
        for (target, settings) in targets {
            if !known_targets.is_empty() && !known_targets.contains(target.as_str()) {
                warnings.push(CheckWarning {
                    level: WarnLevel::Warning,
                    message: format!("hook '{hook}' references unknown target '{target}'"),
                });
            }
            let Some(src) = &settings.source else {
                continue;
            };
            let text = match read_optional(source.as_ref(), src)? {
                Some(text) => Some(text),
                None => read_optional(
                    source.as_ref(),
                    &agentpack_core::paths::join(HOOKS_DIR, src),
                )?,
            };
            match text {
                None => warnings.push(CheckWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "hook '{hook}' ({target}) names missing source '{src}'; target ships without hooks"
                    ),
                }),
                Some(text) => {
                    if serde_json::from_str::<serde_json::Value>(&text).is_err() {
                        warnings.push(CheckWarning {
                            level: WarnLevel::Error,
                            message: format!(
                                "hook '{hook}' ({target}) source '{src}' is not valid JSON"
                            ),
                        });
                    }
                }
            }
        }
    }

    // Canonical mcp.json, when present, must parse.
    for rel in [MCP_FILE, MCP_FILE_FALLBACK] {
        if let Some(text) = read_optional(source.as_ref(), rel)? {
            if serde_json::from_str::<serde_json::Value>(&text).is_err() {
                warnings.push(CheckWarning {
                    level: WarnLevel::Error,
                    message: format!("'{rel}' is not valid JSON; targets ship without MCP config"),
                });
            }
            break;
        }
    }

    // A full dry compile surfaces fatal template problems (missing
    // mandatory sections, unreadable files).
    agentpack_core::compile(source.as_ref(), &config).context("compile failed")?;

    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("ok: template tree and config are consistent");
    } else {
        for w in &warnings {
            let tag = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{tag}: {}", w.message);
        }
        println!("{} finding(s)", warnings.len());
    }
    Ok(())
}
