use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};

use busyrs::cmd::{GenerateArgs, execute_generate};
use busyrs::utils;

/// busyrs-gen - derive function signature models from Rust sources.
///
/// Scans package directories under a source root (default: the active
/// toolchain's library sources) and dumps every exported top-level
/// function with its classified arguments and results.
///
/// Examples:
///   busyrs-gen
///   busyrs-gen --root ./crates --pkg core/src --pkg cli/src --format json
///   busyrs-gen --pkg std/src -vv          (debug notes for omitted types)
#[derive(Parser, Debug)]
#[command(
    name = "busyrs-gen",
    version,
    about = "busyrs-gen - derive function signature models from Rust sources",
    propagate_version = true
)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error log output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    args: GenerateArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute_generate(cli.args, &mut out)?;
    out.flush()?;
    Ok(())
}
