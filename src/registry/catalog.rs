/*!
Built-in function catalog.

Packages (registration order):
  path/filepath : host-separator path functions
  path          : slash-only subset

Each variant of `Function` is one dispatchable command; `signature()`
describes it for usage text and `Invoke::invoke` runs it over raw
command-line arguments. Repeated functions map over every argument and
stop at the first failure, keeping the results produced so far.
*/

use super::paths::{self, PathError, Style};
use super::{Entry, Invoke, Outcome, Registry};
use crate::signature::FunctionSignature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Abs,
    Base(Style),
    Clean(Style),
    Dir(Style),
    EvalSymlinks,
    Ext(Style),
    FromSlash,
    Glob,
    HasPrefix,
    IsAbs(Style),
    Join(Style),
    Match,
    Rel,
    Split(Style),
    SplitList,
    ToSlash,
    VolumeName,
}

/// Functions of the `path/filepath` package, in usage order.
pub const FILEPATH: &[Function] = &[
    Function::Abs,
    Function::Base(Style::Native),
    Function::Clean(Style::Native),
    Function::Dir(Style::Native),
    Function::EvalSymlinks,
    Function::Ext(Style::Native),
    Function::FromSlash,
    Function::Glob,
    Function::HasPrefix,
    Function::IsAbs(Style::Native),
    Function::Join(Style::Native),
    Function::Match,
    Function::Rel,
    Function::Split(Style::Native),
    Function::SplitList,
    Function::ToSlash,
    Function::VolumeName,
];

/// Functions of the slash-only `path` package.
pub const PATH: &[Function] = &[
    Function::Base(Style::Slash),
    Function::Clean(Style::Slash),
    Function::Dir(Style::Slash),
    Function::Ext(Style::Slash),
    Function::IsAbs(Style::Slash),
    Function::Join(Style::Slash),
    Function::Match,
    Function::Split(Style::Slash),
];

/// The registry served by the `busyrs` binary.
pub fn builtin() -> Registry<Function> {
    let entries = |fns: &[Function]| {
        fns.iter()
            .map(|f| Entry::new(f.signature(), *f))
            .collect::<Vec<_>>()
    };
    Registry::new()
        .package(&["path", "filepath"], entries(FILEPATH))
        .package(&["path"], entries(PATH))
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Abs => "Abs",
            Function::Base(_) => "Base",
            Function::Clean(_) => "Clean",
            Function::Dir(_) => "Dir",
            Function::EvalSymlinks => "EvalSymlinks",
            Function::Ext(_) => "Ext",
            Function::FromSlash => "FromSlash",
            Function::Glob => "Glob",
            Function::HasPrefix => "HasPrefix",
            Function::IsAbs(_) => "IsAbs",
            Function::Join(_) => "Join",
            Function::Match => "Match",
            Function::Rel => "Rel",
            Function::Split(_) => "Split",
            Function::SplitList => "SplitList",
            Function::ToSlash => "ToSlash",
            Function::VolumeName => "VolumeName",
        }
    }

    pub fn signature(&self) -> FunctionSignature {
        let sig = FunctionSignature::new(self.name());
        match self {
            Function::Abs | Function::EvalSymlinks => sig
                .arg("path", "string")
                .ret("string")
                .ret("error")
                .repeated(),
            Function::Base(_)
            | Function::Clean(_)
            | Function::Dir(_)
            | Function::Ext(_)
            | Function::FromSlash
            | Function::ToSlash
            | Function::VolumeName => sig.arg("path", "string").ret("string").repeated(),
            Function::IsAbs(_) => sig.arg("path", "string").ret("bool").repeated(),
            Function::Glob => sig
                .arg("pattern", "string")
                .named_ret("matches", "[]string")
                .named_ret("err", "error"),
            Function::HasPrefix => sig.arg("p", "string").arg("prefix", "string").ret("bool"),
            Function::Join(_) => sig.arg("elem", "...string").ret("string"),
            Function::Match => sig
                .arg("pattern", "string")
                .arg("name", "string")
                .named_ret("matched", "bool")
                .named_ret("err", "error"),
            Function::Rel => sig
                .arg("basepath", "string")
                .arg("targpath", "string")
                .ret("string")
                .ret("error"),
            Function::Split(_) => sig
                .arg("path", "string")
                .named_ret("dir", "string")
                .named_ret("file", "string"),
            Function::SplitList => sig.arg("path", "string").ret("[]string"),
        }
    }
}

impl Invoke for Function {
    fn invoke(&self, args: &[String]) -> Outcome {
        let name = self.name();
        match *self {
            Function::Abs => each(name, args, paths::abs),
            Function::EvalSymlinks => each(name, args, paths::eval_symlinks),
            Function::Base(style) => map_all(name, args, |p| paths::base(p, style)),
            Function::Clean(style) => map_all(name, args, |p| paths::clean(p, style)),
            Function::Dir(style) => map_all(name, args, |p| paths::dir(p, style)),
            Function::Ext(style) => map_all(name, args, |p| paths::ext(p, style)),
            Function::FromSlash => map_all(name, args, paths::from_slash),
            Function::ToSlash => map_all(name, args, paths::to_slash),
            Function::VolumeName => map_all(name, args, paths::volume_name),
            Function::IsAbs(style) => {
                map_all(name, args, |p| paths::is_abs(p, style).to_string())
            }
            Function::Join(style) => Outcome::ok(vec![paths::join(args, style)]),
            Function::Glob => match exactly(name, args, 1) {
                Ok(()) => {
                    let (found, err) = paths::glob(&args[0]);
                    Outcome {
                        results: found,
                        error: err,
                    }
                }
                Err(e) => Outcome::err(e),
            },
            Function::HasPrefix => exactly(name, args, 2)
                .map(|()| vec![paths::has_prefix(&args[0], &args[1]).to_string()])
                .map_err(anyhow::Error::from)
                .into(),
            Function::Match => exactly(name, args, 2)
                .map_err(anyhow::Error::from)
                .and_then(|()| paths::matches(&args[0], &args[1]))
                .map(|m| vec![m.to_string()])
                .into(),
            Function::Rel => exactly(name, args, 2)
                .and_then(|()| paths::rel(&args[0], &args[1]))
                .map(|r| vec![r])
                .map_err(anyhow::Error::from)
                .into(),
            Function::Split(style) => exactly(name, args, 1)
                .map(|()| {
                    let (d, f) = paths::split(&args[0], style);
                    vec![d, f]
                })
                .map_err(anyhow::Error::from)
                .into(),
            Function::SplitList => exactly(name, args, 1)
                .map(|()| paths::split_list(&args[0]))
                .map_err(anyhow::Error::from)
                .into(),
        }
    }
}

/* ---- Argument helpers ---- */

fn exactly(function: &'static str, args: &[String], expected: usize) -> Result<(), PathError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(PathError::Arity {
            function,
            expected,
            got: args.len(),
        })
    }
}

/// Apply an infallible function to every argument.
fn map_all(function: &'static str, args: &[String], f: impl Fn(&str) -> String) -> Outcome {
    if args.is_empty() {
        return Outcome::err(PathError::Missing { function });
    }
    Outcome::ok(args.iter().map(|a| f(a)).collect())
}

/// Apply a fallible function to every argument, keeping the results
/// produced before the first failure.
fn each(
    function: &'static str,
    args: &[String],
    f: impl Fn(&str) -> anyhow::Result<String>,
) -> Outcome {
    if args.is_empty() {
        return Outcome::err(PathError::Missing { function });
    }
    let mut results = Vec::with_capacity(args.len());
    for a in args {
        match f(a) {
            Ok(r) => results.push(r),
            Err(e) => return Outcome::partial(results, e),
        }
    }
    Outcome::ok(results)
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn catalog_names_are_unique_per_package() {
        for pkg in builtin().packages() {
            let mut names: Vec<String> = pkg
                .entries
                .iter()
                .map(|e| e.signature.name.to_lowercase())
                .collect();
            let before = names.len();
            names.sort();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate in {}", pkg.joined_path());
        }
    }

    #[test]
    fn filepath_abs_resolves_by_suffix() {
        let reg = builtin();
        let hit = reg.resolve("filepath.Abs").unwrap();
        assert_eq!(hit.package, "path/filepath");
        assert_eq!(hit.entry.function, Function::Abs);
    }

    #[test]
    fn path_package_is_slash_only() {
        let reg = builtin();
        let hit = reg.resolve("path.base").unwrap();
        assert_eq!(hit.entry.function, Function::Base(Style::Slash));
    }

    #[test]
    fn join_signature_is_variadic() {
        let sig = Function::Join(Style::Native).signature();
        assert_eq!(sig.to_string(), "func Join(elem ...string) string");
        assert_eq!(sig.arg_tokens(), vec!["elem", "...", "[...]"]);
    }

    #[test]
    fn abs_signature_renders_error_pair() {
        assert_eq!(
            Function::Abs.signature().to_string(),
            "func Abs(path string) (string, error)"
        );
    }

    #[test]
    fn repeated_maps_every_argument() {
        let out = Function::Base(Style::Slash).invoke(&strings(&["a/b", "c/d.txt"]));
        assert!(out.error.is_none());
        assert_eq!(out.results, strings(&["b", "d.txt"]));
    }

    #[test]
    fn repeated_without_arguments_fails() {
        let out = Function::Clean(Style::Slash).invoke(&[]);
        assert!(out.results.is_empty());
        assert_eq!(out.error.unwrap().to_string(), "Clean: missing argument");
    }

    #[test]
    fn arity_is_checked() {
        let out = Function::Rel.invoke(&strings(&["/a"]));
        assert_eq!(
            out.error.unwrap().to_string(),
            "Rel: expected 2 argument(s), got 1"
        );
    }

    #[test]
    fn eval_symlinks_keeps_partial_results() {
        let dir = std::env::temp_dir();
        let out = Function::EvalSymlinks.invoke(&[
            dir.to_string_lossy().into_owned(),
            "/definitely/not/here/busyrs".to_string(),
        ]);
        assert_eq!(out.results.len(), 1);
        assert!(out.error.is_some());
    }

    #[test]
    fn split_returns_two_tokens() {
        let out = Function::Split(Style::Slash).invoke(&strings(&["a/b"]));
        assert_eq!(out.results, strings(&["a/", "b"]));
    }

    #[test]
    fn match_reports_bool() {
        let out = Function::Match.invoke(&strings(&["*.rs", "lib.rs"]));
        assert_eq!(out.results, strings(&["true"]));
    }
}
