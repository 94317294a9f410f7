//! inv: a terminal inventory manager
//!
//! Items and storage locations live in two JSON files. The `inv` binary
//! works on them through one-shot subcommands or an interactive shell.

pub mod cli;
pub mod core;
pub mod entities;
