//! Command-line interface module.

mod args;
pub mod commands;

pub use args::Cli;
