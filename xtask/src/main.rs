use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for tileworld")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc in sequence
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Run the windowed tick benchmark
    Bench,
    /// Build rustdoc for the workspace
    Doc,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [Commands::Fmt, Commands::Clippy, Commands::Test, Commands::Doc] {
                run(step)?;
            }
        }
        other => run(other)?,
    }

    Ok(())
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Fmt => cargo("fmt", &["fmt", "--all", "--", "--check"]),
        Commands::Clippy => cargo(
            "clippy",
            &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        ),
        Commands::Test => cargo("test", &["test", "--workspace"]),
        Commands::Bench => cargo(
            "bench",
            &["bench", "-p", "tileworld-stream", "--bench", "bench_windowed_tick"],
        ),
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"]),
        Commands::Check => anyhow::bail!("check cannot be nested"),
    }
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {label} failed");
    }
    Ok(())
}
