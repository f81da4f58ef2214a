use crate::error::{PackError, Result};
use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Template-tree directory constants
// ---------------------------------------------------------------------------

pub const AGENTS_DIR: &str = "agents";
pub const SKILLS_DIR: &str = "skills";
pub const COMMANDS_DIR: &str = "commands";
pub const PROTOCOLS_DIR: &str = "protocols";
pub const HOOKS_DIR: &str = "hooks";
pub const HOOK_SCRIPTS_DIR: &str = "hooks/scripts";
pub const RULES_DIR: &str = "rules";

pub const MCP_FILE: &str = "configs/mcp.json";
pub const MCP_FILE_FALLBACK: &str = "mcp.json";

pub const ORDER_FILE: &str = "_order.yaml";
pub const VARIABLES_FILE: &str = "_variables.yaml";

pub const CONFIG_FILE: &str = "agentpack.json";

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

pub const TARGET_CLAUDE: &str = "claude";
pub const TARGET_CURSOR: &str = "cursor";

/// Token in `_order.yaml` entries resolved to the target name at compile time.
pub const TOOL_TOKEN: &str = "{tool}";

/// Rule-file extension for the cursor target.
pub const CURSOR_RULE_EXT: &str = "mdc";

// ---------------------------------------------------------------------------
// Prefix glyph
// ---------------------------------------------------------------------------

/// Single code point prepended to every emitted artifact name, identifying
/// files agentpack owns inside a host config directory.
pub const GLYPH: &str = "\u{2726}"; // ✦

/// Prefix `name` with the glyph. Idempotent: an already-prefixed name is
/// returned unchanged.
pub fn prefixed(name: &str) -> String {
    let prefix = format!("{GLYPH}-");
    if name.starts_with(&prefix) {
        name.to_string()
    } else {
        format!("{prefix}{name}")
    }
}

// ---------------------------------------------------------------------------
// Relative path helpers
// ---------------------------------------------------------------------------

/// Join two template-relative path segments with a forward slash.
pub fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), rest.trim_start_matches('/'))
    }
}

/// A generated output path must be relative, forward-slash separated, and
/// must not escape the target root.
pub fn is_valid_output_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && !path.contains("//")
        && !path.split('/').any(|seg| seg == ".." || seg == "." || seg.is_empty())
}

// ---------------------------------------------------------------------------
// Artifact-name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_name(name: &str) -> Result<()> {
    let bare = name.strip_prefix(&format!("{GLYPH}-")).unwrap_or(name);
    if bare.is_empty() || bare.len() > 64 || !name_re().is_match(bare) {
        return Err(PackError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_is_single_code_point() {
        assert_eq!(GLYPH.chars().count(), 1);
    }

    #[test]
    fn prefix_applies_once() {
        assert_eq!(prefixed("architect"), format!("{GLYPH}-architect"));
    }

    #[test]
    fn prefix_is_idempotent() {
        let once = prefixed("architect");
        assert_eq!(prefixed(&once), once);
    }

    #[test]
    fn join_normalizes_slashes() {
        assert_eq!(join("agents", "foo.md"), "agents/foo.md");
        assert_eq!(join("agents/", "/foo.md"), "agents/foo.md");
        assert_eq!(join("", "foo.md"), "foo.md");
        assert_eq!(join("agents", ""), "agents");
    }

    #[test]
    fn valid_output_paths() {
        for p in [
            "agents/a.md",
            ".mcp.json",
            ".claude-plugin/plugin.json",
            "skills/x/SKILL.md",
        ] {
            assert!(is_valid_output_path(p), "expected valid: {p}");
        }
    }

    #[test]
    fn invalid_output_paths() {
        for p in ["", "/abs/path.md", "a//b.md", "a/../b.md", "a\\b.md", "./a.md"] {
            assert!(!is_valid_output_path(p), "expected invalid: {p}");
        }
    }

    #[test]
    fn valid_names() {
        for name in ["architect", "a", "start-session", "x1"] {
            validate_name(name).unwrap_or_else(|_| panic!("expected valid: {name}"));
        }
    }

    #[test]
    fn prefixed_name_validates_by_stem() {
        validate_name(&prefixed("architect")).unwrap();
    }

    #[test]
    fn invalid_names() {
        for name in ["", "-leading", "trailing-", "has space", "UPPER", "a_b"] {
            assert!(validate_name(name).is_err(), "expected invalid: {name}");
        }
    }
}
