//! CLI commands

pub mod update;
