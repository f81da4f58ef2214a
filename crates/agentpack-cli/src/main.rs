mod cmd;
mod embed;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agentpack",
    about = "Compile a canonical agent-config repo into editor plugin trees",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from agentpack.json or .git/)
    #[arg(long, global = true, env = "AGENTPACK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the template tree into per-target plugin trees
    Compile {
        /// Output directory (default: <root>/dist)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Compile a single target (claude | cursor)
        #[arg(long)]
        target: Option<String>,

        /// Use the embedded starter templates instead of <root>/templates
        #[arg(long)]
        embedded: bool,
    },

    /// Compile one target and write it into the editor's config directory
    Install {
        /// Target to install (claude | cursor)
        target: String,

        /// Destination config directory (default: ~/.claude or ~/.cursor)
        #[arg(long)]
        into: Option<PathBuf>,

        /// Use the embedded starter templates instead of <root>/templates
        #[arg(long)]
        embedded: bool,

        /// List actions without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Lint the template tree and configuration
    Check {
        /// Use the embedded starter templates instead of <root>/templates
        #[arg(long)]
        embedded: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = root::resolve_root(cli.root.as_deref());

    match cli.command {
        Commands::Compile {
            out,
            target,
            embedded,
        } => cmd::compile::run(&root, out, target.as_deref(), embedded, cli.json),
        Commands::Install {
            target,
            into,
            embedded,
            dry_run,
        } => cmd::install::run(&root, &target, into, embedded, dry_run, cli.json),
        Commands::Check { embedded } => cmd::check::run(&root, embedded, cli.json),
    }
}
