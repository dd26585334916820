//! CLI command handlers.

pub mod check;
pub mod common;
pub mod config;
pub mod history;
pub mod init;
pub mod publish;
