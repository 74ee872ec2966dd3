//! CLI module
//!
//! This module provides:
//! - CLI argument definitions (args)
//! - Slash commands for the interactive console (commands)
//! - The console loop itself (repl)

pub mod args;
pub mod commands;
pub mod repl;

pub use args::{Cli, Commands};
pub use commands::{CommandContext, CommandRegistry, CommandResult, SlashCommand};
pub use repl::Repl;
