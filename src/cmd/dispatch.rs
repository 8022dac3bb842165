/*!
`dispatch.rs`

Process entry for the multi-call `busyrs` binary.

Entry styles:
  - Multi-call : argv[0] basename is not `busyrs`. The basename is the
                 function query; argv[1..] are passed verbatim. A leading
                 `-h`/`--help` asks for that function's usage instead.
  - Selector   : argv[0] basename is `busyrs`. Flags are parsed with clap;
                 `-f FUNC` selects the function, trailing positionals are
                 its arguments. Without `-f`, general usage is printed.

The explicit `-f` selector takes precedence over the invocation identity.

Output contract (see `Dispatcher::execute`):
  - stderr : `{error:#}` on one line when the function failed
  - stdout : results joined by single spaces, when non-empty
  Both may be written for the same call.

Exit codes: 0 success or usage, 1 function error, 2 flag misuse.
*/

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::cmd::usage;
use crate::registry::{Invoke, Registry};

/// Generic name of the binary; any other invocation name is multi-call.
pub const BASE_NAME: &str = "busyrs";

/// Flags understood under the base name.
#[derive(Parser, Debug)]
#[command(
    name = BASE_NAME,
    version,
    about = "busyrs - library path functions as individual commands",
    disable_help_flag = true
)]
pub struct DispatchCli {
    /// Invoke function named FUNC ([pkg.]Name, case-insensitive)
    #[arg(short = 'f', value_name = "FUNC")]
    pub func: Option<String>,

    /// Print usage (of FUNC when combined with -f)
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Errors only in logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Arguments passed to FUNC
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Flag help shown in general usage.
pub fn flag_help() -> String {
    DispatchCli::command().render_help().to_string()
}

/* ---- Invocation ---- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Call { query: String, args: Vec<String> },
    FunctionHelp { query: String },
    GeneralUsage,
    Version(String),
    /// Rendered flag parse error.
    Misuse(String),
}

/// What the process was asked to do, derived from argv once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub invoked_as: String,
    pub request: Request,
    pub verbose: u8,
    pub quiet: bool,
}

impl Invocation {
    pub fn from_env() -> Self {
        Self::parse(
            std::env::args_os().map(|a| a.to_string_lossy().into_owned()),
            BASE_NAME,
        )
    }

    pub fn parse<I, S>(argv: I, base_name: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let invoked_as = argv
            .next()
            .map(|a0| invocation_name(&a0))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| base_name.to_string());
        let rest: Vec<String> = argv.collect();

        if invoked_as != base_name {
            let request = match rest.first().map(String::as_str) {
                Some("-h") | Some("--help") => Request::FunctionHelp {
                    query: invoked_as.clone(),
                },
                _ => Request::Call {
                    query: invoked_as.clone(),
                    args: rest,
                },
            };
            return Self {
                invoked_as,
                request,
                verbose: 0,
                quiet: false,
            };
        }

        let parsed =
            DispatchCli::try_parse_from(std::iter::once(base_name.to_string()).chain(rest));
        let cli = match parsed {
            Ok(cli) => cli,
            Err(e) => {
                let request = match e.kind() {
                    ErrorKind::DisplayVersion => Request::Version(e.render().to_string()),
                    _ => Request::Misuse(e.render().to_string()),
                };
                return Self {
                    invoked_as,
                    request,
                    verbose: 0,
                    quiet: false,
                };
            }
        };

        let request = match (cli.func, cli.help) {
            (Some(query), true) => Request::FunctionHelp { query },
            (Some(query), false) => Request::Call {
                query,
                args: cli.args,
            },
            (None, _) => Request::GeneralUsage,
        };
        Self {
            invoked_as,
            request,
            verbose: cli.verbose,
            quiet: cli.quiet,
        }
    }
}

/// Basename of argv[0] without the platform executable suffix.
pub fn invocation_name(argv0: &str) -> String {
    let name = Path::new(argv0)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = std::env::consts::EXE_SUFFIX;
    match name.strip_suffix(suffix) {
        Some(stem) if !suffix.is_empty() => stem.to_string(),
        _ => name,
    }
}

/* ---- Dispatcher ---- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// Usage was printed; informational, not a failure.
    Usage,
    /// The invoked function reported an error.
    Failed,
    Misuse,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Success | Exit::Usage => 0,
            Exit::Failed => 1,
            Exit::Misuse => 2,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit.code())
    }
}

pub struct Dispatcher<'r, F> {
    registry: &'r Registry<F>,
    flag_help: String,
}

impl<'r, F: Invoke> Dispatcher<'r, F> {
    pub fn new(registry: &'r Registry<F>) -> Self {
        Self {
            registry,
            flag_help: flag_help(),
        }
    }

    pub fn execute(
        &self,
        invocation: &Invocation,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<Exit> {
        match &invocation.request {
            Request::GeneralUsage => {
                self.general_usage(invocation, out)?;
                Ok(Exit::Usage)
            }
            Request::Version(text) => {
                write!(out, "{text}")?;
                Ok(Exit::Success)
            }
            Request::Misuse(message) => {
                write!(err, "{message}")?;
                self.general_usage(invocation, out)?;
                Ok(Exit::Misuse)
            }
            Request::FunctionHelp { query } => {
                match self.registry.resolve(query) {
                    Some(hit) => usage::write_function(out, &hit.package, &hit.entry.signature)?,
                    None => self.general_usage(invocation, out)?,
                }
                Ok(Exit::Usage)
            }
            Request::Call { query, args } => {
                let Some(hit) = self.registry.resolve(query) else {
                    tracing::debug!(query = %query, "no such function");
                    self.general_usage(invocation, out)?;
                    return Ok(Exit::Usage);
                };
                tracing::debug!(
                    package = %hit.package,
                    function = %hit.entry.signature.name,
                    argc = args.len(),
                    "invoking"
                );
                let outcome = hit.entry.function.invoke(args);

                // An error never suppresses results; both channels are written.
                if let Some(e) = &outcome.error {
                    writeln!(err, "{e:#}")?;
                }
                if !outcome.results.is_empty() {
                    writeln!(out, "{}", outcome.results.join(" "))?;
                }
                Ok(if outcome.is_err() {
                    Exit::Failed
                } else {
                    Exit::Success
                })
            }
        }
    }

    fn general_usage(&self, invocation: &Invocation, out: &mut impl Write) -> io::Result<()> {
        usage::write_general(out, &invocation.invoked_as, &self.flag_help, self.registry)
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Invocation {
        Invocation::parse(argv.iter().copied(), BASE_NAME)
    }

    #[test]
    fn invocation_name_strips_directories() {
        assert_eq!(invocation_name("/usr/local/bin/abs"), "abs");
        assert_eq!(invocation_name("busyrs"), "busyrs");
        assert_eq!(invocation_name(""), "");
    }

    #[test]
    fn multicall_passes_args_verbatim() {
        let inv = parse(&["/bin/abs", "-f", "rel/path"]);
        assert_eq!(inv.invoked_as, "abs");
        assert_eq!(
            inv.request,
            Request::Call {
                query: "abs".into(),
                args: vec!["-f".into(), "rel/path".into()],
            }
        );
    }

    #[test]
    fn multicall_help_flag() {
        let inv = parse(&["join", "--help"]);
        assert_eq!(
            inv.request,
            Request::FunctionHelp {
                query: "join".into()
            }
        );
    }

    #[test]
    fn selector_flag_overrides_identity() {
        let inv = parse(&["busyrs", "-f", "filepath.Join", "a", "-b"]);
        assert_eq!(
            inv.request,
            Request::Call {
                query: "filepath.Join".into(),
                args: vec!["a".into(), "-b".into()],
            }
        );
    }

    #[test]
    fn base_name_without_selector_is_usage() {
        assert_eq!(parse(&["busyrs"]).request, Request::GeneralUsage);
        assert_eq!(parse(&[]).request, Request::GeneralUsage);
        assert_eq!(parse(&["busyrs", "-h"]).request, Request::GeneralUsage);
    }

    #[test]
    fn selector_with_help_is_function_help() {
        assert_eq!(
            parse(&["busyrs", "-f", "abs", "-h"]).request,
            Request::FunctionHelp {
                query: "abs".into()
            }
        );
    }

    #[test]
    fn missing_selector_value_is_misuse() {
        assert!(matches!(
            parse(&["busyrs", "-f"]).request,
            Request::Misuse(_)
        ));
    }

    #[test]
    fn verbosity_is_collected() {
        let inv = parse(&["busyrs", "-vv", "-f", "abs", "x"]);
        assert_eq!(inv.verbose, 2);
        assert!(!inv.quiet);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(Exit::Success.code(), 0);
        assert_eq!(Exit::Usage.code(), 0);
        assert_eq!(Exit::Failed.code(), 1);
        assert_eq!(Exit::Misuse.code(), 2);
    }

    #[test]
    fn flag_help_mentions_selector() {
        assert!(flag_help().contains("-f <FUNC>"));
    }
}
