/*!
Signature model shared by the dispatcher and the source scanner.

A `FunctionSignature` names a function and lists its arguments and
results. Each entry is a `Param`: a bare identifier type tagged with a
`ListKind` (scalar / array / variadic) and an optional display name.

Formatting entry points:
  - `Display for Param`             -> `name []type`
  - `Display for FunctionSignature` -> `func Name(args) (rets)`
  - `FunctionSignature::arg_tokens` -> per-function usage argument tokens
  - `FunctionSignature::ret_tokens` -> per-function usage return tokens
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel appended to the argument tokens of variadic signatures.
pub const REPEAT_SENTINEL: &str = "[...]";

/// Marker token following array and variadic params.
pub const LIST_MARKER: &str = "...";

/* ---- Errors ---- */

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("type name is not a bare identifier: {0:?}")]
    NotAnIdentifier(String),
    #[error("parameter name is not an identifier: {0:?}")]
    BadName(String),
}

/* ---- List kind ---- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Scalar,
    Array,
    Variadic,
}

impl ListKind {
    /// Type prefix used when rendering a declaration (`[]` / `...`).
    pub fn prefix(&self) -> &'static str {
        match self {
            ListKind::Scalar => "",
            ListKind::Array => "[]",
            ListKind::Variadic => "...",
        }
    }

    pub fn is_list(&self) -> bool {
        !matches!(self, ListKind::Scalar)
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListKind::Scalar => "scalar",
            ListKind::Array => "array",
            ListKind::Variadic => "variadic",
        };
        f.write_str(s)
    }
}

/// Whether `s` is a bare identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_bare_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/* ---- Param ---- */

/// One argument or result of a function signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub list: ListKind,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Param {
    pub fn new(list: ListKind, type_name: impl Into<String>) -> Result<Self, ModelError> {
        let type_name = type_name.into();
        if !is_bare_identifier(&type_name) {
            return Err(ModelError::NotAnIdentifier(type_name));
        }
        Ok(Self {
            name: None,
            list,
            type_name,
        })
    }

    pub fn scalar(type_name: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(ListKind::Scalar, type_name)
    }

    /// Parse a declaration type such as `string`, `[]string` or `...string`.
    pub fn parse(spec: &str) -> Result<Self, ModelError> {
        let spec = spec.trim();
        if let Some(elem) = spec.strip_prefix("...") {
            Self::new(ListKind::Variadic, elem)
        } else if let Some(elem) = spec.strip_prefix("[]") {
            Self::new(ListKind::Array, elem)
        } else {
            Self::new(ListKind::Scalar, spec)
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if !is_bare_identifier(&name) {
            return Err(ModelError::BadName(name));
        }
        self.name = Some(name);
        Ok(self)
    }

    /// Name shown in usage text: the param name, else its type.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.type_name)
    }

    /// One or two usage tokens: the display name and, for list kinds, `...`.
    pub fn tokens(&self) -> Vec<&str> {
        let mut out = vec![self.display_name()];
        if self.list.is_list() {
            out.push(LIST_MARKER);
        }
        out
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(f, "{}{}", self.list.prefix(), self.type_name)
    }
}

/* ---- Function signature ---- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub args: Vec<Param>,
    pub rets: Vec<Param>,
    /// Applied to each argument in turn by the dispatcher.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            rets: Vec::new(),
            repeated: false,
        }
    }

    /// Add a named argument from a declaration type (`string`, `...string`).
    /// Invalid declarations are omitted with a warning.
    pub fn arg(mut self, name: &str, spec: &str) -> Self {
        match Param::parse(spec).and_then(|p| p.named(name)) {
            Ok(p) => self.args.push(p),
            Err(e) => tracing::warn!(function = %self.name, "omitting argument {name}: {e}"),
        }
        self
    }

    /// Add an unnamed result.
    pub fn ret(mut self, spec: &str) -> Self {
        match Param::parse(spec) {
            Ok(p) => self.rets.push(p),
            Err(e) => tracing::warn!(function = %self.name, "omitting result: {e}"),
        }
        self
    }

    /// Add a named result.
    pub fn named_ret(mut self, name: &str, spec: &str) -> Self {
        match Param::parse(spec).and_then(|p| p.named(name)) {
            Ok(p) => self.rets.push(p),
            Err(e) => tracing::warn!(function = %self.name, "omitting result {name}: {e}"),
        }
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Variadic signatures accept an open-ended argument list.
    pub fn is_variadic(&self) -> bool {
        self.repeated || self.args.iter().any(|a| a.list == ListKind::Variadic)
    }

    pub fn arg_tokens(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.args.iter().flat_map(Param::tokens).collect();
        if self.is_variadic() {
            out.push(REPEAT_SENTINEL);
        }
        out
    }

    pub fn ret_tokens(&self) -> Vec<&str> {
        self.rets.iter().flat_map(Param::tokens).collect()
    }

    /// Return signature as shown after the argument list: empty, bare, or
    /// parenthesized for multiple results.
    pub fn ret_signature(&self) -> String {
        let rets: Vec<String> = self.rets.iter().map(ToString::to_string).collect();
        match rets.len() {
            0 => String::new(),
            1 => rets[0].clone(),
            _ => format!("({})", rets.join(", ")),
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        write!(f, "func {}({})", self.name, args.join(", "))?;
        let rets = self.ret_signature();
        if !rets.is_empty() {
            write!(f, " {rets}")?;
        }
        Ok(())
    }
}

/* --------------------------------- Tests ---------------------------------- */
