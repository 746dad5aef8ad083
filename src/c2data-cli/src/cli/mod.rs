//! CLI argument definitions for c2data
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod extract;

pub use core::{Cli, Commands};
pub use extract::ExtractArgs;
