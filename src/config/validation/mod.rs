//! Configuration validation
//!
//! - `trait_def`: the `Validate` trait
//! - `config_validators`: engine and logging validators
//! - `tests`: validator tests

mod config_validators;
mod trait_def;

pub use trait_def::Validate;
