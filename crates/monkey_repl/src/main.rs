mod repl;

use std::{fs, io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Interactive interpreter for the monkey language
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Evaluate this script and print its value instead of starting the interactive prompt
    file: Option<PathBuf>,

    /// Prompt shown before each line
    #[arg(long, default_value = ">> ")]
    prompt: String,

    /// Print the parsed program in canonical form instead of evaluating it
    #[arg(long)]
    ast: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = repl::Config {
        prompt: args.prompt,
        print_ast: args.ast,
    };

    match args.file {
        Some(path) => {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            repl::run_source(&source, &config, &mut io::stdout().lock())
                .context("failed to write output")?;
            Ok(())
        }
        None => repl::repl(&config),
    }
}
