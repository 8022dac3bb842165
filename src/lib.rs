//! busyrs: a multi-call dispatcher over a catalog of library functions,
//! plus a source scanner that derives signature models from Rust code.
//!
//! Modules:
//!   signature : shared signature model and its formatting
//!   registry  : package registry, resolver, built-in catalog
//!   cmd       : dispatcher / generator command layers and usage text
//!   scan      : syn-based source scanner
//!   utils     : logging setup

pub mod cmd;
pub mod registry;
pub mod scan;
pub mod signature;
pub mod utils;
