//! CLI argument models and validation for the afk responder binary.

pub mod cli_args;
pub mod cli_validation;

pub use cli_args::Cli;
pub use cli_validation::*;
