//! Lexical path operations behind the catalog.
//!
//! Two separator styles: `Native` follows the host (`std::path`), `Slash`
//! treats only `/` as a separator. Everything here is string based except
//! the filesystem lookups (`abs`, `eval_symlinks`, `glob`).

use anyhow::{Context, Result};
use std::path::{Component, MAIN_SEPARATOR, Path};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("{function}: expected {expected} argument(s), got {got}")]
    Arity {
        function: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{function}: missing argument")]
    Missing { function: &'static str },
    #[error("Rel: can't make {target} relative to {base}")]
    NotRelative { base: String, target: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Native,
    Slash,
}

impl Style {
    pub fn separator(self) -> char {
        match self {
            Style::Native => MAIN_SEPARATOR,
            Style::Slash => '/',
        }
    }

    pub fn is_separator(self, c: char) -> bool {
        match self {
            Style::Native => std::path::is_separator(c),
            Style::Slash => c == '/',
        }
    }

    fn volume_len(self, path: &str) -> usize {
        match self {
            Style::Native => volume_name(path).len(),
            Style::Slash => 0,
        }
    }

    fn last_separator(self, path: &str) -> Option<usize> {
        path.rfind(|c: char| self.is_separator(c))
    }
}

/// Leading volume (`C:`, `\\host\share`), empty on Unix.
pub fn volume_name(path: &str) -> String {
    match Path::new(path).components().next() {
        Some(Component::Prefix(prefix)) => prefix.as_os_str().to_string_lossy().into_owned(),
        _ => String::new(),
    }
}

/// Shortest lexically equivalent path: collapses separators, drops `.`,
/// resolves `..` against preceding elements.
pub fn clean(path: &str, style: Style) -> String {
    let vol_len = style.volume_len(path);
    let (volume, rest) = path.split_at(vol_len);
    if rest.is_empty() {
        return format!("{volume}.");
    }

    let rooted = rest.starts_with(|c: char| style.is_separator(c));
    let mut stack: Vec<&str> = Vec::new();
    for elem in rest.split(|c: char| style.is_separator(c)) {
        match elem {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ if rooted => {}
                _ => stack.push(".."),
            },
            other => stack.push(other),
        }
    }

    let sep = style.separator().to_string();
    let body = stack.join(&sep);
    let out = match (rooted, body.is_empty()) {
        (true, _) => format!("{sep}{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    };
    format!("{volume}{out}")
}

/// Last element of `path`, ignoring trailing separators.
pub fn base(path: &str, style: Style) -> String {
    if path.is_empty() {
        return ".".into();
    }
    let trimmed = path.trim_end_matches(|c: char| style.is_separator(c));
    let trimmed = &trimmed[style.volume_len(trimmed)..];
    let last = match style.last_separator(trimmed) {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    };
    if last.is_empty() {
        style.separator().to_string()
    } else {
        last.to_string()
    }
}

/// All but the last element, cleaned.
pub fn dir(path: &str, style: Style) -> String {
    let vol_len = style.volume_len(path);
    let volume = &path[..vol_len];
    let upto = match style.last_separator(path) {
        Some(i) if i >= vol_len => i + 1,
        _ => vol_len,
    };
    let dir = clean(&path[vol_len..upto], style);
    if dir == "." && volume.len() > 2 {
        return volume.to_string();
    }
    format!("{volume}{dir}")
}

/// Extension of the final element, including the dot.
pub fn ext(path: &str, style: Style) -> String {
    for (i, c) in path.char_indices().rev() {
        if style.is_separator(c) {
            break;
        }
        if c == '.' {
            return path[i..].to_string();
        }
    }
    String::new()
}

/// Split after the final separator into (dir, file).
pub fn split(path: &str, style: Style) -> (String, String) {
    let vol_len = style.volume_len(path);
    let at = match style.last_separator(path) {
        Some(i) if i >= vol_len => i + 1,
        _ => vol_len,
    };
    (path[..at].to_string(), path[at..].to_string())
}

/// Join non-empty elements with the separator and clean the result.
pub fn join<S: AsRef<str>>(elems: &[S], style: Style) -> String {
    let parts: Vec<&str> = elems
        .iter()
        .map(AsRef::as_ref)
        .filter(|e| !e.is_empty())
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join(&style.separator().to_string()), style)
}

pub fn is_abs(path: &str, style: Style) -> bool {
    match style {
        Style::Native => Path::new(path).is_absolute(),
        Style::Slash => path.starts_with('/'),
    }
}

pub fn from_slash(path: &str) -> String {
    path.replace('/', &MAIN_SEPARATOR.to_string())
}

pub fn to_slash(path: &str) -> String {
    path.replace(MAIN_SEPARATOR, "/")
}

/// Absolute, cleaned form of `path` relative to the working directory.
pub fn abs(path: &str) -> Result<String> {
    if is_abs(path, Style::Native) {
        return Ok(clean(path, Style::Native));
    }
    let cwd = std::env::current_dir().context("Abs: cannot determine working directory")?;
    let joined = cwd.join(path);
    Ok(clean(&joined.to_string_lossy(), Style::Native))
}

pub fn eval_symlinks(path: &str) -> Result<String> {
    let resolved = std::fs::canonicalize(path)
        .with_context(|| format!("EvalSymlinks: {path}"))?;
    Ok(resolved.to_string_lossy().into_owned())
}

/// Expand `pattern`; entries that cannot be read are reported after the
/// readable matches.
pub fn glob(pattern: &str) -> (Vec<String>, Option<anyhow::Error>) {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(e) => return (Vec::new(), Some(anyhow::Error::new(e).context("Glob: bad pattern"))),
    };
    let mut matches = Vec::new();
    let mut first_err = None;
    for entry in paths {
        match entry {
            Ok(p) => matches.push(p.to_string_lossy().into_owned()),
            Err(e) if first_err.is_none() => first_err = Some(anyhow::Error::new(e).context("Glob")),
            Err(_) => {}
        }
    }
    (matches, first_err)
}

/// Shell pattern match of the whole `name`; `*` does not cross separators.
pub fn matches(pattern: &str, name: &str) -> Result<bool> {
    let pat = glob::Pattern::new(pattern).context("Match: bad pattern")?;
    let opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    Ok(pat.matches_with(name, opts))
}

pub fn has_prefix(path: &str, prefix: &str) -> bool {
    Path::new(path).starts_with(prefix)
}

/// Relative path from `base` to `target`, both lexically cleaned first.
pub fn rel(base: &str, target: &str) -> Result<String, PathError> {
    let not_relative = || PathError::NotRelative {
        base: base.to_string(),
        target: target.to_string(),
    };
    let b = clean(base, Style::Native);
    let t = clean(target, Style::Native);
    if b == t {
        return Ok(".".into());
    }
    if is_abs(&b, Style::Native) != is_abs(&t, Style::Native) {
        return Err(not_relative());
    }
    let diff = pathdiff::diff_paths(&t, &b).ok_or_else(not_relative)?;
    let out = diff.to_string_lossy().into_owned();
    Ok(if out.is_empty() { ".".into() } else { out })
}

/// Entries of a `PATH`-style list; an empty input has no entries.
pub fn split_list(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    std::env::split_paths(path)
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

/* --------------------------------- Tests ---------------------------------- */
