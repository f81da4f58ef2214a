//! The compile entry point.
//!
//! A compile is a pure, single-threaded function of (TemplateSource,
//! TargetConfig): no suspension points, no ordering races, all generated
//! content buffered in memory. Determinism is carried by explicit
//! frontmatter key orders, `_order.yaml` ordering, and sorted directory
//! listings — never by map iteration order.

use crate::config::TargetConfig;
use crate::error::Result;
use crate::paths::{TARGET_CLAUDE, TARGET_CURSOR};
use crate::source::TemplateSource;
use crate::target::{claude, cursor, GeneratedFile};

#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub claude: Vec<GeneratedFile>,
    pub cursor: Vec<GeneratedFile>,
}

impl CompileOutput {
    pub fn for_target(&self, target: &str) -> Option<&[GeneratedFile]> {
        match target {
            TARGET_CLAUDE => Some(&self.claude),
            TARGET_CURSOR => Some(&self.cursor),
            _ => None,
        }
    }

    pub fn targets() -> [&'static str; 2] {
        [TARGET_CLAUDE, TARGET_CURSOR]
    }
}

/// Run both target adapters over one template tree.
pub fn compile(source: &dyn TemplateSource, config: &TargetConfig) -> Result<CompileOutput> {
    let claude = claude::generate(source, config)?;
    let cursor = cursor::generate(source, config)?;
    tracing::debug!(
        claude = claude.len(),
        cursor = cursor.len(),
        "compile finished"
    );
    Ok(CompileOutput { claude, cursor })
}

// ---------------------------------------------------------------------------
// Tests — end-to-end scenarios
// ---------------------------------------------------------------------------
