//! Command handlers for the c2data CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod extract;
pub mod inspect;
pub mod lang;
