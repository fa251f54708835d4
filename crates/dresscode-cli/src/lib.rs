//! Dresscode CLI library.
//!
//! Argument parsing, settings assembly and the `run`, `validate` and
//! `models` commands behind the `dresscode` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod settings;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
