//! Fraudscan CLI library
//!
//! The binary in `main.rs` only parses arguments and dispatches; command
//! handlers live here so integration tests can drive them directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
