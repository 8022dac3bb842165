/*!
`generate.rs`

Implements the `busyrs-gen` command: scans package directories under a
source root and dumps one record per exported function.

Behavior:
  - `--root` falls back to `BUSYRS_ROOT`, then to the host toolchain's
    library sources: `$(rustc --print sysroot)/lib/rustlib/src/rust/library`
    (`RUSTC` overrides the compiler path).
  - `--pkg` is repeatable; values must be non-empty, made of letters,
    digits and `/`, and unique. Without `--pkg` the default list is used.
  - Configuration problems abort before any file is parsed.

JSON / YAML record shape:
[
  {
    "package": "std/src",
    "directory": "/.../library/std/src",
    "file": "env.rs",
    "name": "var",
    "args": [ { "name": "key", "list": "scalar", "type": "str" } ],
    "rets": [ { "list": "scalar", "type": "String" }, { "list": "scalar", "type": "error" } ],
    "omitted": [ { "position": "arg", "index": 0, "shape": "K" } ]
  }
]
*/

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::scan::{self, Omission, PackageList, PackageScan, packages};
use crate::signature::Param;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DumpFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// CLI arguments for `busyrs-gen`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source root containing the package directories
    /// (default: the toolchain's library sources)
    #[arg(long, value_name = "PATH", env = "BUSYRS_ROOT")]
    pub root: Option<PathBuf>,

    /// Package path to scan, relative to the root (repeatable)
    #[arg(long = "pkg", value_name = "PATH", value_parser = parse_package)]
    pub pkg: Vec<String>,

    /// Output format of the function dump
    #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
    pub format: DumpFormat,
}

fn parse_package(value: &str) -> Result<String, packages::PackageError> {
    packages::validate(value)?;
    Ok(value.to_string())
}

/// One dumped function.
#[derive(Debug, Serialize)]
struct Record<'a> {
    package: &'a str,
    directory: &'a Path,
    file: &'a str,
    name: &'a str,
    args: &'a [Param],
    rets: &'a [Param],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    repeated: bool,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    omitted: &'a [Omission],
}

/// Entry point for `busyrs-gen`.
pub fn execute_generate(args: GenerateArgs, out: &mut impl Write) -> Result<()> {
    let packages = if args.pkg.is_empty() {
        PackageList::defaults()
    } else {
        PackageList::from_values(&args.pkg).context("invalid --pkg")?
    };

    let root = match args.root {
        Some(r) => r,
        None => default_root().context("cannot determine default --root; pass --root")?,
    };
    tracing::info!(root = %root.display(), packages = %packages, "scanning");

    let scans = scan::scan_packages(&root, &packages)?;
    write_dump(&scans, args.format, out)
}

pub fn write_dump(scans: &[PackageScan], format: DumpFormat, out: &mut impl Write) -> Result<()> {
    match format {
        DumpFormat::Text => write_text(scans, out)?,
        DumpFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &records(scans))?;
            writeln!(out)?;
        }
        DumpFormat::Yaml => serde_yaml::to_writer(&mut *out, &records(scans))?,
    }
    Ok(())
}

fn records(scans: &[PackageScan]) -> Vec<Record<'_>> {
    scans
        .iter()
        .flat_map(|s| {
            s.functions.iter().map(move |f| Record {
                package: &s.package,
                directory: &s.directory,
                file: &f.file,
                name: &f.signature.name,
                args: &f.signature.args,
                rets: &f.signature.rets,
                repeated: f.signature.repeated,
                omitted: &f.omitted,
            })
        })
        .collect()
}

fn write_text(scans: &[PackageScan], out: &mut impl Write) -> std::io::Result<()> {
    for s in scans {
        writeln!(out, "package {:?} ({} functions)", s.package, s.functions.len())?;
        for f in &s.functions {
            writeln!(out, "\t{}\t// {}", f.signature, f.file)?;
            for o in &f.omitted {
                let position = match o.position {
                    scan::Position::Arg => "arg",
                    scan::Position::Ret => "ret",
                };
                writeln!(out, "\t\t# omitted {position} {}: {}", o.index, o.shape)?;
            }
        }
    }
    Ok(())
}

/// Library sources of the active toolchain.
pub fn default_root() -> Result<PathBuf> {
    let rustc = std::env::var_os("RUSTC").unwrap_or_else(|| "rustc".into());
    let output = Command::new(&rustc)
        .args(["--print", "sysroot"])
        .output()
        .with_context(|| format!("failed to run {}", rustc.to_string_lossy()))?;
    if !output.status.success() {
        bail!(
            "{} --print sysroot failed: {}",
            rustc.to_string_lossy(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    let sysroot = String::from_utf8(output.stdout).context("sysroot is not UTF-8")?;
    Ok(Path::new(sysroot.trim()).join("lib/rustlib/src/rust/library"))
}

/* --------------------------------- Tests ---------------------------------- */
