//! ## Crate layout
//! - `core`: tag parsing, rule registry, built-in rules, the field walker,
//!   options, configuration, and the document store seam.
//! - `Record`: derive macro that makes a struct walkable.
//!
//! Typical use: derive `Record`, tag fields with `#[vault("...")]`, build a
//! [`Validator`], and call `validate` (or go through a [`store::Collection`]).
//!
//! The `prelude` module exports what application code usually needs.

pub use docvault_core as core;
pub use docvault_core::*;
pub use docvault_derive::Record;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Record,
        core::{
            Document, Error, Validator, Value,
            config::Config,
            context::Context,
            error::{ErrorCode, FieldError},
            options::{FieldPath, Method, Options},
            reflect::Record,
            store::{Collection, DocumentStore, MemoryStore, SetMode},
        },
    };
}

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
