//! CLI command implementations

pub mod utils;

pub mod add;
pub mod completions;
pub mod config;
pub mod data;
pub mod delete;
pub mod edit;
pub mod find;
pub mod labels;
pub mod list;
pub mod location;
pub mod shell;
pub mod show;
