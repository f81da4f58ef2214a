//! Additive JSON-merge payloads.
//!
//! Some hosts keep a single user-maintained config file (hooks, MCP
//! servers) that a plugin must not overwrite wholesale. For those, an
//! adapter emits a merge payload: a content object plus the list of
//! dotted key paths the payload owns. The installer applies the payload
//! by overwriting exactly the managed paths and preserving every other
//! key the user put in the host file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMergePayload {
    pub managed_keys: Vec<String>,
    pub content: Value,
}

impl JsonMergePayload {
    pub fn new(managed_keys: Vec<String>, content: Value) -> Self {
        Self {
            managed_keys,
            content,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize with two-space indentation and a trailing newline.
    pub fn to_json_string(&self) -> String {
        let mut out = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        out.push('\n');
        out
    }

    /// Apply this payload onto a host document. Each managed path is set
    /// from `content`, or removed when `content` has nothing at that
    /// path. Unmanaged host keys are untouched.
    pub fn apply_to(&self, host: &mut Value) {
        for path in &self.managed_keys {
            match get_path(&self.content, path) {
                Some(value) => set_path(host, path, value.clone()),
                None => remove_path(host, path),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dotted-path helpers
// ---------------------------------------------------------------------------

pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cur = value;
    for seg in path.split('.') {
        cur = cur.as_object()?.get(seg)?;
    }
    Some(cur)
}

/// Set `path` to `new`, creating intermediate objects as needed. A
/// non-object intermediate is replaced by an object.
pub fn set_path(value: &mut Value, path: &str, new: Value) {
    let mut cur = value;
    let segs: Vec<&str> = path.split('.').collect();
    for (i, seg) in segs.iter().enumerate() {
        if !cur.is_object() {
            *cur = Value::Object(serde_json::Map::new());
        }
        let map = cur.as_object_mut().unwrap();
        if i == segs.len() - 1 {
            map.insert(seg.to_string(), new);
            return;
        }
        cur = map
            .entry(seg.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
}

pub fn remove_path(value: &mut Value, path: &str) {
    let segs: Vec<&str> = path.split('.').collect();
    let mut cur = value;
    for seg in &segs[..segs.len() - 1] {
        match cur.as_object_mut().and_then(|m| m.get_mut(*seg)) {
            Some(next) => cur = next,
            None => return,
        }
    }
    if let Some(map) = cur.as_object_mut() {
        map.remove(*segs.last().unwrap());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
