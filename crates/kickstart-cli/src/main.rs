mod cmd;
mod root;

use clap::Parser;
use kickstart_core::provision::ProcessRunner;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kickstart",
    about = "Set up a freshly created project: seed .env, rename the project, install dependencies, then remove the setup files",
    version
)]
struct Cli {
    /// Project root (default: current directory)
    #[arg(long, env = "KICKSTART_ROOT")]
    root: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long, short = 'j')]
    json: bool,

    /// Don't run the dependency manager
    #[arg(long)]
    no_provision: bool,

    /// Leave the setup scripts and config in place
    #[arg(long)]
    keep_self: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let root = root::resolve_root(cli.root.as_deref())?;
    let opts = cmd::bootstrap::Options {
        skip_provision: cli.no_provision,
        keep_self: cli.keep_self,
        quiet: cli.json,
    };
    let mut runner = ProcessRunner {
        stdout_to_stderr: cli.json,
    };
    let report = cmd::bootstrap::run(&root, &mut runner, opts)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
