use crate::output::print_json;
use agentpack_core::merge::JsonMergePayload;
use agentpack_core::writer;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
enum InstallAction {
    Write { path: String },
    Merge { path: String },
}

/// Compile one target and place its files into the editor's config
/// directory. Merge payloads (`*.merge.json`) are never copied: each is
/// applied additively to the host file it shadows, overwriting only its
/// managed keys.
pub fn run(
    root: &Path,
    target: &str,
    into: Option<PathBuf>,
    embedded: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (source, config) = super::load_inputs(root, embedded)?;
    let output =
        agentpack_core::compile(source.as_ref(), &config).context("compile failed")?;
    let files = output
        .for_target(target)
        .with_context(|| format!("unknown target '{target}' (expected claude or cursor)"))?;

    let dest = match into {
        Some(dir) => dir,
        None => default_config_dir(target)
            .context("cannot determine the config directory; pass --into")?,
    };

    if !dry_run {
        writer::ensure_dir(&dest)?;
    }

    let mut actions = Vec::new();
    for file in files {
        if let Some(host_rel) = merge_host_path(&file.path) {
            let host_path = join_rel(&dest, &host_rel);
            if !dry_run {
                let payload = JsonMergePayload::from_json_str(&file.content)
                    .with_context(|| format!("invalid merge payload {}", file.path))?;
                let mut host: serde_json::Value = match std::fs::read_to_string(&host_path) {
                    Ok(text) => serde_json::from_str(&text).with_context(|| {
                        format!("host file {} is not valid JSON", host_path.display())
                    })?,
                    Err(_) => serde_json::json!({}),
                };
                payload.apply_to(&mut host);
                let mut text = serde_json::to_string_pretty(&host)?;
                text.push('\n');
                writer::atomic_write(&host_path, text.as_bytes())?;
                tracing::debug!(path = %host_path.display(), "applied merge payload");
            }
            actions.push(InstallAction::Merge {
                path: host_path.display().to_string(),
            });
        } else {
            let path = join_rel(&dest, &file.path);
            if !dry_run {
                writer::atomic_write(&path, file.content.as_bytes())?;
            }
            actions.push(InstallAction::Write {
                path: path.display().to_string(),
            });
        }
    }

    if json {
        print_json(&actions)?;
    } else {
        let verb = if dry_run { "would" } else { "did" };
        for action in &actions {
            match action {
                InstallAction::Write { path } => println!("{verb} write: {path}"),
                InstallAction::Merge { path } => println!("{verb} merge: {path}"),
            }
        }
        println!(
            "{} file(s) for target '{target}' -> {}",
            actions.len(),
            dest.display()
        );
    }
    Ok(())
}

/// `hooks/hooks.merge.json` shadows `hooks/hooks.json`; any other path is
/// a plain copy.
fn merge_host_path(path: &str) -> Option<String> {
    path.strip_suffix(".merge.json")
        .map(|stem| format!("{stem}.json"))
}

fn join_rel(base: &Path, rel: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for seg in rel.split('/') {
        path.push(seg);
    }
    path
}

fn default_config_dir(target: &str) -> Option<PathBuf> {
    let home = home::home_dir()?;
    match target {
        agentpack_core::paths::TARGET_CLAUDE => Some(home.join(".claude")),
        agentpack_core::paths::TARGET_CURSOR => Some(home.join(".cursor")),
        _ => None,
    }
}
