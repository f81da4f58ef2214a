//! `{name}` variable substitution for composed section bodies.

use std::collections::BTreeMap;

fn is_placeholder_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Replace every `{name}` whose name appears in `vars` with its value.
///
/// Unknown placeholders are left untouched so they surface visibly in
/// review. Substitution is global and unrecursive: a value containing
/// `{x}` does not trigger a second pass.
pub fn substitute(input: &str, vars: &BTreeMap<String, String>) -> String {
    if vars.is_empty() || !input.contains('{') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        // A placeholder is `{` + identifier chars + `}`.
        let end = after.find(|c: char| !is_placeholder_char(c));
        match end {
            Some(end) if end > 0 && after[end..].starts_with('}') => {
                let name = &after[..end];
                match vars.get(name) {
                    Some(value) => {
                        out.push_str(value);
                        rest = &after[end + 1..];
                    }
                    None => {
                        // Leave unresolved placeholder as-is.
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                        rest = &after[end + 1..];
                    }
                }
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
