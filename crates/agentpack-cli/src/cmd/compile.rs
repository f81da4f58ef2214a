use crate::output::print_json;
use agentpack_core::compile::CompileOutput;
use agentpack_core::writer;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct TargetSummary {
    target: String,
    out_dir: String,
    files: Vec<String>,
}

pub fn run(
    root: &Path,
    out: Option<PathBuf>,
    target: Option<&str>,
    embedded: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (source, config) = super::load_inputs(root, embedded)?;
    let output =
        agentpack_core::compile(source.as_ref(), &config).context("compile failed")?;

    let out_root = out.unwrap_or_else(|| root.join("dist"));
    let targets: Vec<&str> = match target {
        Some(t) => vec![t],
        None => CompileOutput::targets().to_vec(),
    };

    let mut summaries = Vec::new();
    for t in targets {
        let files = output
            .for_target(t)
            .with_context(|| format!("unknown target '{t}' (expected claude or cursor)"))?;
        let dir = out_root.join(t);
        writer::write_generated(files, &dir)?;
        tracing::debug!(count = files.len(), out = %dir.display(), "wrote target tree");
        summaries.push(TargetSummary {
            target: t.to_string(),
            out_dir: dir.display().to_string(),
            files: files.iter().map(|f| f.path.clone()).collect(),
        });
    }

    if json {
        print_json(&summaries)?;
    } else {
        for s in &summaries {
            println!("{}: {} files -> {}", s.target, s.files.len(), s.out_dir);
        }
    }
    Ok(())
}
