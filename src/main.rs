use anyhow::{Context, Result};
use std::io::{self, Write};
use std::process::ExitCode;

use busyrs::cmd::{Dispatcher, Invocation};
use busyrs::{registry, utils};

/// busyrs - library path functions as individual commands.
///
/// Invocation styles:
///   busyrs -f <func> [ARGS]...     explicit selector
///   <func> [ARGS]...               multi-call (copy / link named after a function)
///   <func> --help                  usage of a single function
///   busyrs                         general usage with the function catalog
///
/// Function queries: `Name`, `pkg.Name` or `pkg/path.Name`, case-insensitive;
/// the package part matches a path suffix (e.g. `filepath.Abs`).
///
/// Logging goes to stderr: -v / -vv / -q under the base name, or
/// BUSYRS_LOG=<directive> in any mode.
fn main() -> Result<ExitCode> {
    let invocation = Invocation::from_env();

    let level = utils::derive_level(invocation.verbose, invocation.quiet);
    utils::init_logging(level);

    let registry = registry::builtin();
    let dispatcher = Dispatcher::new(&registry);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let exit = dispatcher
        .execute(&invocation, &mut out, &mut err)
        .context("failed to write output")?;
    out.flush().context("failed to flush stdout")?;

    Ok(exit.into())
}
