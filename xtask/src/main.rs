use anyhow::{
    Context,
    Result,
    ensure,
};
use clap::{
    Parser,
    Subcommand,
};
use std::{
    path::Path,
    process::Command,
};

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Housebook helper tasks (fmt, clippy, unit and integration tests)",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check formatting for the entire workspace
    Fmt {
        /// Rewrite files instead of checking
        #[arg(long)]
        fix: bool,
    },
    /// Run clippy for the entire workspace with warnings-as-errors
    Clippy,
    /// Run unit tests followed by the integration-tests package
    Test {
        /// Skip the integration-tests package
        #[arg(long)]
        skip_integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = repo_root();

    match cli.command {
        Commands::Fmt { fix } => run_fmt(&root, fix)?,
        Commands::Clippy => run_clippy(&root)?,
        Commands::Test { skip_integration } => {
            run_unit_tests(&root)?;
            if !skip_integration {
                run_integration_tests(&root)?;
            }
        }
    }

    Ok(())
}

fn repo_root() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("xtask has no parent directory")
        .to_path_buf()
}

fn run_fmt(root: &Path, fix: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all").current_dir(root);
    if !fix {
        cmd.arg("--").arg("--check");
    }
    run_command(cmd, "cargo fmt")?;
    Ok(())
}

fn run_clippy(root: &Path) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy")
        .arg("--workspace")
        .arg("--all-targets")
        .arg("--all-features")
        .arg("--")
        .arg("-D")
        .arg("warnings")
        .current_dir(root);
    run_command(cmd, "cargo clippy")?;
    Ok(())
}

fn run_unit_tests(root: &Path) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("test")
        .arg("--workspace")
        .arg("--exclude")
        .arg("integration-tests")
        .current_dir(root);
    run_command(cmd, "cargo test --workspace")?;
    Ok(())
}

fn run_integration_tests(root: &Path) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("test")
        .arg("-p")
        .arg("integration-tests")
        .current_dir(root);
    run_command(cmd, "cargo test -p integration-tests")?;
    Ok(())
}

fn run_command(mut cmd: Command, label: &str) -> Result<()> {
    println!("Running: {}", label);
    let status = cmd
        .status()
        .with_context(|| format!("failed to run {label}"))?;
    ensure!(status.success(), "{label} failed with status {status}");
    Ok(())
}
