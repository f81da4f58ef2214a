//! Restricted YAML subset used by artifact frontmatter, `_order.yaml`, and
//! `_variables.yaml`.
//!
//! This is deliberately not a general YAML implementation. Recognized:
//! plain and quoted scalars, `true`/`false`, `null`/`~`, integers, floats,
//! inline string arrays (`[a, b]`), block string arrays (`- item` lines),
//! and one-level string maps. Anchors, tags, multi-line scalars, flow maps,
//! and deep nesting are out of scope; inputs using them degrade to partial
//! results. Parsing never fails — all inputs are authored in-repo and
//! reviewed, so malformed lines are dropped rather than aborting a compile.

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Value / Mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
    /// One-level map, used by `_variables.yaml` target blocks.
    Map(BTreeMap<String, String>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn opt_str(s: Option<&str>) -> Value {
        match s {
            Some(s) => Value::Str(s.to_string()),
            None => Value::Null,
        }
    }

    pub fn opt_list(items: Option<&[String]>) -> Value {
        match items {
            Some(items) => Value::List(items.to_vec()),
            None => Value::Null,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

pub type Mapping = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Line-level helpers
// ---------------------------------------------------------------------------

/// Strip a `#` comment: at line start, or preceded by whitespace outside
/// quotes. Applied to YAML metadata lines only — never to markdown bodies.
fn strip_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut prev_is_space = true; // line start counts
    for (i, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single && !in_double && prev_is_space => {
                return line[..i].trim_end();
            }
            _ => {}
        }
        prev_is_space = ch.is_whitespace();
    }
    line.trim_end()
}

/// Strip one layer of matching single or double quotes, unescaping inner
/// `\"` in the double-quoted case.
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].replace("\\\"", "\"")
    } else if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn parse_scalar(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        return Value::Str(unquote(s));
    }
    match s {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" | "~" => return Value::Null,
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Int(i);
    }
    if !s.starts_with('+') && s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::Str(s.to_string())
}

fn parse_inline_array(s: &str) -> Vec<String> {
    let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
    inner
        .split(',')
        .map(unquote)
        .filter(|item| !item.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Mapping parser
// ---------------------------------------------------------------------------

/// Parse a YAML mapping best-effort. Malformed lines are dropped; the
/// result is whatever could be understood.
pub fn parse_mapping(input: &str) -> Mapping {
    let lines: Vec<&str> = input.lines().collect();
    let mut map = Mapping::new();
    let mut i = 0;

    while i < lines.len() {
        let line = strip_comment(lines[i]);
        i += 1;
        if line.trim().is_empty() || line.starts_with(char::is_whitespace) {
            continue; // blank, comment-only, or stray continuation
        }
        let Some(colon) = line.find(':') else {
            continue; // not a key — dropped
        };
        let key = line[..colon].trim().to_string();
        if key.is_empty() {
            continue;
        }
        let rest = line[colon + 1..].trim();

        if !rest.is_empty() {
            if rest.starts_with('[') && rest.ends_with(']') {
                map.insert(key, Value::List(parse_inline_array(rest)));
            } else {
                map.insert(key, parse_scalar(rest));
            }
            continue;
        }

        // Bare `key:` — look ahead for a block list or a one-level map.
        let mut items: Vec<String> = Vec::new();
        let mut entries: BTreeMap<String, String> = BTreeMap::new();
        while i < lines.len() {
            let next = strip_comment(lines[i]);
            let trimmed = next.trim();
            if trimmed.is_empty() {
                i += 1;
                continue;
            }
            if !next.starts_with(char::is_whitespace) {
                break; // back at top level
            }
            if let Some(item) = trimmed.strip_prefix("- ") {
                items.push(unquote(item));
            } else if let Some(colon) = trimmed.find(':') {
                let k = trimmed[..colon].trim();
                let v = trimmed[colon + 1..].trim();
                if !k.is_empty() {
                    entries.insert(k.to_string(), unquote(v));
                }
            }
            // anything else indented is malformed — dropped
            i += 1;
        }

        if !items.is_empty() {
            map.insert(key, Value::List(items));
        } else if !entries.is_empty() {
            map.insert(key, Value::Map(entries));
        } else {
            map.insert(key, Value::Null);
        }
    }

    map
}

/// Parse `_order.yaml`: a plain list, either block items or a single inline
/// array. Malformed lines are dropped.
pub fn parse_list(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in input.lines() {
        let line = strip_comment(line);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(item) = trimmed.strip_prefix("- ") {
            let item = unquote(item);
            if !item.is_empty() {
                out.push(item);
            }
        } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
            out.extend(parse_inline_array(trimmed));
        }
        // anything else is malformed — dropped
    }
    out
}

// ---------------------------------------------------------------------------
// Frontmatter split
// ---------------------------------------------------------------------------

/// Split a markdown file into (frontmatter, body).
///
/// A file whose first non-empty line is `---`, followed by a YAML block and
/// a closing `---`, has frontmatter; everything after the closing delimiter
/// (minus one separating blank line) is the body. Files without the
/// envelope have empty frontmatter and the whole content as body.
pub fn split_frontmatter(content: &str) -> (Mapping, String) {
    // split_inclusive keeps line endings, so offsets stay exact for both
    // LF and CRLF files.
    let mut offset = 0usize;
    let mut iter = content.split_inclusive('\n');

    // Skip leading blank lines.
    let mut first = None;
    for line in iter.by_ref() {
        if line.trim().is_empty() {
            offset += line.len();
            continue;
        }
        first = Some(line);
        break;
    }
    let Some(first) = first else {
        return (Mapping::new(), content.to_string());
    };
    if first.trim_end() != "---" {
        return (Mapping::new(), content.to_string());
    }
    offset += first.len();

    let mut yaml_block = String::new();
    let mut body_start = None;
    for line in iter {
        offset += line.len();
        if line.trim_end() == "---" {
            body_start = Some(offset);
            break;
        }
        yaml_block.push_str(line);
    }

    let Some(body_start) = body_start else {
        // Unterminated envelope — treat the whole file as body.
        return (Mapping::new(), content.to_string());
    };

    let mut body = content[body_start..].to_string();
    // One blank line separates delimiter from body; it belongs to the
    // envelope, not the body.
    if let Some(stripped) = body.strip_prefix("\r\n") {
        body = stripped.to_string();
    } else if let Some(stripped) = body.strip_prefix('\n') {
        body = stripped.to_string();
    }

    (parse_mapping(&yaml_block), body)
}

// ---------------------------------------------------------------------------
// Serializer
// ---------------------------------------------------------------------------

const QUOTE_TRIGGERS: [char; 6] = [':', '#', '{', '}', '[', ']'];

fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.trim() != s {
        return true;
    }
    if s.contains(&QUOTE_TRIGGERS[..]) {
        return true;
    }
    if s.starts_with('"') || s.starts_with('\'') {
        return true;
    }
    // A bare emission of these would re-parse as a different type.
    !matches!(parse_scalar(s), Value::Str(_))
}

fn emit_scalar(s: &str) -> String {
    if needs_quoting(s) {
        format!("\"{}\"", s.replace('"', "\\\""))
    } else {
        s.to_string()
    }
}

/// Serialize frontmatter fields in exactly the order given. Null values and
/// empty lists are omitted entirely.
pub fn serialize_frontmatter(fields: &[(&str, Value)]) -> String {
    let mut out = String::new();
    for (key, value) in fields {
        match value {
            Value::Null => {}
            Value::Bool(b) => out.push_str(&format!("{key}: {b}\n")),
            Value::Int(i) => out.push_str(&format!("{key}: {i}\n")),
            Value::Float(f) => out.push_str(&format!("{key}: {f}\n")),
            Value::Str(s) => out.push_str(&format!("{key}: {}\n", emit_scalar(s))),
            Value::List(items) => {
                if items.is_empty() {
                    continue;
                }
                out.push_str(&format!("{key}:\n"));
                for item in items {
                    out.push_str(&format!("  - {}\n", emit_scalar(item)));
                }
            }
            Value::Map(entries) => {
                if entries.is_empty() {
                    continue;
                }
                out.push_str(&format!("{key}:\n"));
                for (k, v) in entries {
                    out.push_str(&format!("  {k}: {}\n", emit_scalar(v)));
                }
            }
        }
    }
    out
}

/// Wrap `body` in a frontmatter envelope. When every field serializes to
/// nothing, the body is returned unchanged with no markers.
pub fn wrap_frontmatter(fields: &[(&str, Value)], body: &str) -> String {
    let fm = serialize_frontmatter(fields);
    if fm.is_empty() {
        body.to_string()
    } else {
        format!("---\n{fm}---\n\n{body}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_scalars() {
        let m = parse_mapping("name: architect\nmodel: opus\n");
        assert_eq!(m.get("name"), Some(&Value::str("architect")));
        assert_eq!(m.get("model"), Some(&Value::str("opus")));
    }

    #[test]
    fn parses_quoted_scalars() {
        let m = parse_mapping("a: \"hello: world\"\nb: 'single'\n");
        assert_eq!(m.get("a"), Some(&Value::str("hello: world")));
        assert_eq!(m.get("b"), Some(&Value::str("single")));
    }

    #[test]
    fn parses_bool_null_numbers() {
        let m = parse_mapping("t: true\nf: false\nn: null\ntilde: ~\ni: 42\nfl: 2.5\n");
        assert_eq!(m.get("t"), Some(&Value::Bool(true)));
        assert_eq!(m.get("f"), Some(&Value::Bool(false)));
        assert_eq!(m.get("n"), Some(&Value::Null));
        assert_eq!(m.get("tilde"), Some(&Value::Null));
        assert_eq!(m.get("i"), Some(&Value::Int(42)));
        assert_eq!(m.get("fl"), Some(&Value::Float(2.5)));
    }

    #[test]
    fn parses_inline_array() {
        let m = parse_mapping("tools: [Read, Grep, \"Bash(git:*)\"]\n");
        assert_eq!(
            m.get("tools"),
            Some(&Value::List(vec![
                "Read".into(),
                "Grep".into(),
                "Bash(git:*)".into()
            ]))
        );
    }

    #[test]
    fn parses_block_array() {
        let m = parse_mapping("tools:\n  - Read\n  - Grep\n");
        assert_eq!(
            m.get("tools"),
            Some(&Value::List(vec!["Read".into(), "Grep".into()]))
        );
    }

    #[test]
    fn parses_one_level_map() {
        let m = parse_mapping("claude:\n  worker: teammate\n  tool_name: \"Long Form\"\n");
        let inner = m.get("claude").and_then(|v| v.as_map()).unwrap();
        assert_eq!(inner.get("worker").map(String::as_str), Some("teammate"));
        assert_eq!(inner.get("tool_name").map(String::as_str), Some("Long Form"));
    }

    #[test]
    fn bare_key_is_null() {
        let m = parse_mapping("memory:\n");
        assert_eq!(m.get("memory"), Some(&Value::Null));
    }

    #[test]
    fn strips_comments_outside_quotes() {
        let m = parse_mapping("# leading\nkey: value # trailing\nq: \"a # not comment\"\n");
        assert_eq!(m.get("key"), Some(&Value::str("value")));
        assert_eq!(m.get("q"), Some(&Value::str("a # not comment")));
    }

    #[test]
    fn malformed_lines_are_dropped() {
        let m = parse_mapping("good: 1\nthis line has no colon\n  stray: indent\nalso: 2\n");
        assert_eq!(m.get("good"), Some(&Value::Int(1)));
        assert_eq!(m.get("also"), Some(&Value::Int(2)));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn parse_list_block_form() {
        let items = parse_list("- sections/010-header.md\n- {tool}/020-identity.md\n");
        assert_eq!(
            items,
            vec!["sections/010-header.md", "{tool}/020-identity.md"]
        );
    }

    #[test]
    fn parse_list_inline_form() {
        let items = parse_list("[a.md, b.md, c.md]\n");
        assert_eq!(items, vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn parse_list_drops_malformed() {
        let items = parse_list("- ok.md\nnot a list entry\n- also-ok.md\n");
        assert_eq!(items, vec!["ok.md", "also-ok.md"]);
    }

    #[test]
    fn split_with_envelope() {
        let (fm, body) = split_frontmatter("---\nname: x\n---\n\n# Body\n");
        assert_eq!(fm.get("name"), Some(&Value::str("x")));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn split_without_envelope() {
        let content = "# Just markdown\n\nNo frontmatter here.\n";
        let (fm, body) = split_frontmatter(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn split_unterminated_envelope_is_all_body() {
        let content = "---\nname: x\nno closing\n";
        let (fm, body) = split_frontmatter(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn split_tolerates_leading_blank_lines() {
        let (fm, body) = split_frontmatter("\n\n---\na: 1\n---\nbody\n");
        assert_eq!(fm.get("a"), Some(&Value::Int(1)));
        assert_eq!(body, "body\n");
    }

    #[test]
    fn body_comments_are_preserved() {
        let (_, body) = split_frontmatter("---\na: 1\n---\n\n# This heading stays\n");
        assert!(body.contains("# This heading stays"));
    }

    #[test]
    fn split_handles_crlf_envelopes() {
        let (fm, body) = split_frontmatter("---\r\nname: x\r\n---\r\n\r\n# Body\r\n");
        assert_eq!(fm.get("name"), Some(&Value::str("x")));
        assert_eq!(body, "# Body\r\n");
    }

    #[test]
    fn split_empty_body_after_envelope() {
        let (fm, body) = split_frontmatter("---\na: 1\n---\n");
        assert_eq!(fm.get("a"), Some(&Value::Int(1)));
        assert_eq!(body, "");
    }

    #[test]
    fn comments_inside_block_lists_are_stripped() {
        let m = parse_mapping("tools:\n  - Read # the reader\n  # whole-line comment\n  - Grep\n");
        assert_eq!(
            m.get("tools"),
            Some(&Value::List(vec!["Read".into(), "Grep".into()]))
        );
    }

    #[test]
    fn serializer_respects_caller_order() {
        let fields = vec![
            ("name", Value::str("z")),
            ("model", Value::str("opus")),
            ("color", Value::str("#7B68EE")),
        ];
        let out = serialize_frontmatter(&fields);
        assert_eq!(out, "name: z\nmodel: opus\ncolor: \"#7B68EE\"\n");
    }

    #[test]
    fn serializer_omits_null_and_empty_list() {
        let fields = vec![
            ("name", Value::str("a")),
            ("memory", Value::Null),
            ("tools", Value::List(vec![])),
        ];
        assert_eq!(serialize_frontmatter(&fields), "name: a\n");
    }

    #[test]
    fn serializer_quotes_special_chars() {
        let fields = vec![("d", Value::str("a: b"))];
        assert_eq!(serialize_frontmatter(&fields), "d: \"a: b\"\n");
        let fields = vec![("d", Value::str("say \"hi\" [ok]"))];
        assert_eq!(
            serialize_frontmatter(&fields),
            "d: \"say \\\"hi\\\" [ok]\"\n"
        );
    }

    #[test]
    fn serializer_emits_block_lists() {
        let fields = vec![(
            "tools",
            Value::List(vec!["Read".into(), "Grep".into()]),
        )];
        assert_eq!(serialize_frontmatter(&fields), "tools:\n  - Read\n  - Grep\n");
    }

    #[test]
    fn wrap_with_empty_frontmatter_returns_body() {
        let body = "# Plain\n";
        assert_eq!(wrap_frontmatter(&[("x", Value::Null)], body), body);
    }

    #[test]
    fn wrap_with_fields() {
        let out = wrap_frontmatter(&[("name", Value::str("a"))], "body\n");
        assert_eq!(out, "---\nname: a\n---\n\nbody\n");
    }

    #[test]
    fn frontmatter_round_trips() {
        let fields = vec![
            ("name", Value::str("architect")),
            ("model", Value::str("opus")),
            ("flag", Value::Bool(true)),
            ("count", Value::Int(3)),
            ("desc", Value::str("does: things")),
            ("weird", Value::str("true")),
            ("tools", Value::List(vec!["Read".into(), "Grep".into()])),
        ];
        let wrapped = wrap_frontmatter(&fields, "body\n");
        let (parsed, body) = split_frontmatter(&wrapped);
        assert_eq!(body, "body\n");
        for (key, value) in &fields {
            assert_eq!(parsed.get(*key), Some(value), "key {key} did not round-trip");
        }
    }

    #[test]
    fn serialized_frontmatter_is_valid_yaml() {
        let fields = vec![
            ("name", Value::str("a-b")),
            ("color", Value::str("#7B68EE")),
            ("desc", Value::str("with \"quotes\" and: colon")),
            ("tools", Value::List(vec!["Read".into(), "Bash(git:*)".into()])),
            ("flag", Value::Bool(false)),
        ];
        let out = serialize_frontmatter(&fields);
        let parsed: serde_yaml::Value = serde_yaml::from_str(&out).expect("valid YAML");
        assert_eq!(parsed["name"], serde_yaml::Value::from("a-b"));
        assert_eq!(parsed["color"], serde_yaml::Value::from("#7B68EE"));
    }
}
