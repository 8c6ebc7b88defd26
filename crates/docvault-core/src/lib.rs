//! Core runtime for docvault: tag parsing, the rule registry, built-in
//! rules, the reflective field walker, and the options that drive it.
//!
//! Records opt in field by field through tag strings
//! (`name,rule,rule=param,omitempty`). The walker applies the rules in tag
//! order and assembles a [`Document`] ready to hand to a store.
#![warn(unreachable_pub)]

extern crate self as docvault;

// public exports are one module level down
pub mod config;
pub mod context;
pub mod error;
pub mod options;
pub mod reflect;
pub mod registry;
pub mod rule;
pub mod store;
pub mod tag;
pub mod validator;
pub mod value;

mod walker;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;
pub use validator::Validator;
pub use value::{Document, Value};

///
/// CONSTANTS
///

/// Name of the field attribute read by `#[derive(Record)]`.
pub const TAG_ATTRIBUTE: &str = "vault";
