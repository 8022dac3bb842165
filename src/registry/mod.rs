/*!
Registry of dispatchable functions.

Layout:
  Registry
    Package { path: ["path", "filepath"], entries }
      Entry { signature, function }

The registry is built once at startup and never mutated afterwards.
Resolution (`resolve`) maps a free-form query `"[pkg.]Name"` to the
first matching entry in registration order:
  - the last `.`-separated segment is the function name
  - preceding segments, joined with `/`, filter packages by path suffix
  - both parts compare case-insensitively

Implementations are a closed set (see `catalog::Function`) invoked through
the `Invoke` trait; the registry is generic over it so callers may supply
their own set.
*/

pub mod catalog;
pub mod paths;

use crate::signature::FunctionSignature;

pub use catalog::{Function, builtin};

/* ---- Invocation contract ---- */

/// Result of invoking a function: results and error are independent, a
/// function may return partial results alongside an error.
#[derive(Debug, Default)]
pub struct Outcome {
    pub results: Vec<String>,
    pub error: Option<anyhow::Error>,
}

impl Outcome {
    pub fn ok(results: Vec<String>) -> Self {
        Self {
            results,
            error: None,
        }
    }

    pub fn err(error: impl Into<anyhow::Error>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn partial(results: Vec<String>, error: impl Into<anyhow::Error>) -> Self {
        Self {
            results,
            error: Some(error.into()),
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

impl From<anyhow::Result<Vec<String>>> for Outcome {
    fn from(r: anyhow::Result<Vec<String>>) -> Self {
        match r {
            Ok(v) => Outcome::ok(v),
            Err(e) => Outcome::err(e),
        }
    }
}

/// Common contract of every dispatchable function.
pub trait Invoke {
    fn invoke(&self, args: &[String]) -> Outcome;
}

/* ---- Data Structures ---- */

#[derive(Debug, Clone)]
pub struct Entry<F> {
    pub signature: FunctionSignature,
    pub function: F,
}

impl<F> Entry<F> {
    pub fn new(signature: FunctionSignature, function: F) -> Self {
        Self {
            signature,
            function,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Package<F> {
    pub path: Vec<String>,
    pub entries: Vec<Entry<F>>,
}

impl<F> Package<F> {
    /// Segments joined with `/`, as shown in usage text.
    pub fn joined_path(&self) -> String {
        self.path.join("/")
    }

    /// Whether `filter` (already lowercased) selects this package: empty,
    /// equal, or a suffix on a `/` boundary.
    fn matches_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let own = self.joined_path().to_lowercase();
        own == filter
            || own
                .strip_suffix(filter)
                .is_some_and(|head| head.ends_with('/'))
    }
}

/// A resolved query.
#[derive(Debug)]
pub struct Resolved<'r, F> {
    /// Lowercased joined package path.
    pub package: String,
    pub entry: &'r Entry<F>,
}

#[derive(Debug, Clone)]
pub struct Registry<F> {
    packages: Vec<Package<F>>,
}

impl<F> Default for Registry<F> {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
        }
    }
}

impl<F> Registry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a package; registration order is resolution and usage order.
    pub fn package(mut self, path: &[&str], entries: Vec<Entry<F>>) -> Self {
        self.packages.push(Package {
            path: path.iter().map(|s| s.to_string()).collect(),
            entries,
        });
        self
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package<F>> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.iter().map(|p| p.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry matching `query`, in registration order.
    pub fn resolve_all<'r>(&'r self, query: &str) -> Vec<Resolved<'r, F>> {
        let (filter, name) = split_query(query);
        if name.is_empty() {
            return Vec::new();
        }
        let mut found = Vec::new();
        for pkg in self.packages.iter().filter(|p| p.matches_filter(&filter)) {
            for entry in &pkg.entries {
                if entry.signature.name.to_lowercase() == name {
                    found.push(Resolved {
                        package: pkg.joined_path().to_lowercase(),
                        entry,
                    });
                }
            }
        }
        found
    }

    /// First entry matching `query`. Suffix ties go to the first registered
    /// package.
    pub fn resolve<'r>(&'r self, query: &str) -> Option<Resolved<'r, F>> {
        let mut all = self.resolve_all(query);
        if all.len() > 1 {
            tracing::debug!(query, matches = all.len(), "ambiguous query, using first match");
        }
        if all.is_empty() {
            None
        } else {
            Some(all.swap_remove(0))
        }
    }
}

/// Split `"a.b.Name"` into a lowercased package filter (`"a/b"`) and name.
fn split_query(query: &str) -> (String, String) {
    let query = query.trim();
    match query.rsplit_once('.') {
        Some((pkg, name)) => (
            pkg.split('.').collect::<Vec<_>>().join("/").to_lowercase(),
            name.to_lowercase(),
        ),
        None => (String::new(), query.to_lowercase()),
    }
}

/* --------------------------------- Tests ---------------------------------- */
