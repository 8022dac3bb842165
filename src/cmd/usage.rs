/*!
Usage rendering for the dispatcher.

General usage (no function resolved, or invoked under the base name):

  Usage of busyrs:
  <flag help>

  The following library functions are supported:
  	package "path/filepath"
  		func Abs(path string) (string, error)
  		...

Per-function usage (a function resolved and help requested):

  Usage of ("path/filepath") abs:
  	abs path [...]
  		returns: string, error

Rendering only writes to the given sink; it never decides exit status.
*/

use std::io::{self, Write};

use crate::registry::Registry;
use crate::signature::FunctionSignature;

pub fn write_general<F>(
    out: &mut impl Write,
    invoked_as: &str,
    flag_help: &str,
    registry: &Registry<F>,
) -> io::Result<()> {
    writeln!(out, "Usage of {invoked_as}:")?;
    let flag_help = flag_help.trim_end();
    if !flag_help.is_empty() {
        writeln!(out, "{flag_help}")?;
    }
    writeln!(out, "\nThe following library functions are supported:")?;
    for pkg in registry.packages() {
        writeln!(out, "\tpackage {:?}", pkg.joined_path())?;
        for entry in &pkg.entries {
            writeln!(out, "\t\t{}", entry.signature)?;
        }
    }
    Ok(())
}

pub fn write_function(
    out: &mut impl Write,
    package: &str,
    signature: &FunctionSignature,
) -> io::Result<()> {
    let name = signature.name.to_lowercase();
    writeln!(out, "Usage of ({package:?}) {name}:")?;
    let args = signature.arg_tokens();
    if args.is_empty() {
        writeln!(out, "\t{name}")?;
    } else {
        writeln!(out, "\t{name} {}", args.join(" "))?;
    }
    let rets = signature.ret_tokens();
    if !rets.is_empty() {
        writeln!(out, "\t\treturns: {}", rets.join(", "))?;
    }
    Ok(())
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Entry;
    use pretty_assertions::assert_eq;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn general_lists_packages_in_order() {
        let reg = Registry::new()
            .package(
                &["path", "filepath"],
                vec![Entry::new(
                    FunctionSignature::new("Abs")
                        .arg("path", "string")
                        .ret("string")
                        .ret("error"),
                    (),
                )],
            )
            .package(
                &["path"],
                vec![Entry::new(
                    FunctionSignature::new("Join").arg("elem", "...string").ret("string"),
                    (),
                )],
            );
        let text = render(|out| write_general(out, "busyrs", "  -f <FUNC>\n", &reg));
        assert_eq!(
            text,
            "Usage of busyrs:\n  -f <FUNC>\n\nThe following library functions are supported:\n\
             \tpackage \"path/filepath\"\n\t\tfunc Abs(path string) (string, error)\n\
             \tpackage \"path\"\n\t\tfunc Join(elem ...string) string\n"
        );
    }

    #[test]
    fn function_usage_with_returns() {
        let sig = FunctionSignature::new("Abs")
            .arg("path", "string")
            .ret("string")
            .ret("error")
            .repeated();
        let text = render(|out| write_function(out, "path/filepath", &sig));
        assert_eq!(
            text,
            "Usage of (\"path/filepath\") abs:\n\tabs path [...]\n\t\treturns: string, error\n"
        );
    }

    #[test]
    fn function_usage_without_returns() {
        let sig = FunctionSignature::new("Touch").arg("path", "string");
        let text = render(|out| write_function(out, "fs", &sig));
        assert_eq!(text, "Usage of (\"fs\") touch:\n\ttouch path\n");
    }
}
