use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use colored::Colorize;
use dstool::ctx::AppContext;
use dstool::sync;

#[derive(Parser)]
#[command(name = "dstool", version, about = "Design token pipeline")]
struct Cli {
    /// Root directory of the token files.
    #[arg(long, global = true, default_value = "tokens")]
    tokens_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CSS and SCSS files from the token documents.
    Build {
        /// Project override document merged into the UI color trees.
        #[arg(long)]
        project_overrides: Option<PathBuf>,
    },
    /// Push local semantic tokens to Figma variables.
    Push,
    /// Pull Figma variables into the local semantic token files.
    Pull,
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::new(cli.tokens_dir);

    match cli.command {
        Commands::Build { project_overrides } => ctx.build(project_overrides.as_deref()),
        Commands::Push => sync::push::run(&ctx),
        Commands::Pull => sync::pull::run(&ctx),
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{}", format!("error: {e:#}").red().bold());
        exit(1);
    }
}
