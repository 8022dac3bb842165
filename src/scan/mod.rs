/*!
Source scanner: derives signature models from directories of Rust files.

Flow (`scan_packages` / `scan`):
  1. every directory is checked up front; the first missing or
     non-directory path aborts before anything is parsed
  2. per directory, in order: list `*.rs` files (non-recursive, sorted by
     name, test-only files skipped), parse each with `syn`, visit
     top-level `pub fn` items
  3. one `PackageScan` per directory; directories never interleave

Test-only files: `tests.rs`, `test.rs`, `*_test.rs`, `*_tests.rs`.
*/

pub mod packages;
pub mod visitor;

use serde::Serialize;
use std::path::{Path, PathBuf};
use syn::visit::Visit;
use walkdir::WalkDir;

pub use packages::{PackageError, PackageList};
pub use visitor::{FnVisitor, Omission, Position, ScannedFunction};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("invalid package source directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to list {}: {source}", dir.display())]
    List {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse: {}: {file}: {source}", dir.display())]
    Parse {
        dir: PathBuf,
        file: String,
        #[source]
        source: syn::Error,
    },
}

/// Functions discovered in one directory.
#[derive(Debug, Clone, Serialize)]
pub struct PackageScan {
    pub package: String,
    pub directory: PathBuf,
    pub functions: Vec<ScannedFunction>,
}

/// Scan `root/<package>` for every package in the list.
pub fn scan_packages(root: &Path, packages: &PackageList) -> Result<Vec<PackageScan>, ScanError> {
    let dirs = packages
        .iter()
        .map(str::to_string)
        .zip(packages.with_prefix(root))
        .collect();
    scan_labeled(dirs)
}

/// Scan directories labelled by their own path.
pub fn scan<P: AsRef<Path>>(directories: &[P]) -> Result<Vec<PackageScan>, ScanError> {
    let dirs = directories
        .iter()
        .map(|d| {
            let d = d.as_ref();
            (d.display().to_string(), d.to_path_buf())
        })
        .collect();
    scan_labeled(dirs)
}

fn scan_labeled(dirs: Vec<(String, PathBuf)>) -> Result<Vec<PackageScan>, ScanError> {
    if let Some((_, bad)) = dirs.iter().find(|(_, d)| !d.is_dir()) {
        return Err(ScanError::NotADirectory(bad.clone()));
    }
    dirs.into_iter()
        .map(|(package, dir)| scan_dir(package, dir))
        .collect()
}

/// Scan a single directory; files are merged in file-name order.
pub fn scan_dir(package: String, dir: PathBuf) -> Result<PackageScan, ScanError> {
    let mut functions = Vec::new();
    let walker = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| ScanError::List {
            dir: dir.clone(),
            source,
        })?;
        let file = entry.file_name().to_string_lossy().into_owned();
        if !entry.path().is_file() || !is_source_file(&file) {
            continue;
        }
        let content = std::fs::read_to_string(entry.path()).map_err(|source| ScanError::Read {
            path: entry.path().to_path_buf(),
            source,
        })?;
        let found = parse_source(&file, &content).map_err(|source| ScanError::Parse {
            dir: dir.clone(),
            file: file.clone(),
            source,
        })?;
        tracing::trace!(file = %file, functions = found.len(), "parsed");
        functions.extend(found);
    }

    tracing::info!(package = %package, functions = functions.len(), "scanned");
    Ok(PackageScan {
        package,
        directory: dir,
        functions,
    })
}

/// Exported functions of one source file.
pub fn parse_source(file: &str, content: &str) -> Result<Vec<ScannedFunction>, syn::Error> {
    let ast = syn::parse_file(content)?;
    let mut visitor = FnVisitor::new(file);
    visitor.visit_file(&ast);
    Ok(visitor.into_functions())
}

pub fn is_source_file(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".rs") else {
        return false;
    };
    !(stem == "tests" || stem == "test" || stem.ends_with("_test") || stem.ends_with("_tests"))
}
