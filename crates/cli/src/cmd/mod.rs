//! CLI command implementations

pub mod add;
pub mod check;
pub mod config;
pub mod watch;
