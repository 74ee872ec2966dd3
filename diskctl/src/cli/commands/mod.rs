//! Slash command system for the interactive console
//!
//! Commands like `/disks` or `/cd docs` are registered in a registry and
//! dispatched based on user input. Anything else typed at the prompt is a
//! command batch for the engine.

mod browse;
mod clear;
mod help;
mod journal;
mod script;
mod session;

pub use browse::{BackCommand, CatCommand, CdCommand, DiskCommand, DisksCommand, LsCommand, PartCommand, TopCommand};
pub use clear::ClearCommand;
pub use help::{ExitCommand, HelpCommand};
pub use journal::JournalCommand;
pub use script::{EditCommand, InputCommand, LoadCommand, RunCommand};
pub use session::{LoginCommand, LogoutCommand, WhoamiCommand};

use crate::output::{OutputEvent, OutputWriter};
use crate::workbench::Workbench;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

// ============================================================================
// Command Context
// ============================================================================

/// Context passed to commands during execution
pub struct CommandContext<'a> {
    /// All client state
    pub workbench: &'a mut Workbench,
    /// The output writer
    pub output: &'a dyn OutputWriter,
}

impl CommandContext<'_> {
    /// Write a batch of rendered events
    pub fn emit(&self, events: Vec<OutputEvent>) {
        for event in events {
            self.output.write(event);
        }
    }
}

// ============================================================================
// Command Result
// ============================================================================

/// Result of executing a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully
    Ok,
    /// Command executed, display this message
    Message(String),
    /// A remote call was started; its result arrives later
    Pending,
    /// Following prompt lines go into the input buffer
    Compose,
    /// Exit the console
    Exit,
}

// ============================================================================
// SlashCommand Trait
// ============================================================================

/// Trait for slash commands
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// Command name (without the leading slash)
    fn name(&self) -> &'static str;

    /// Short description for help text
    fn description(&self) -> &'static str;

    /// Argument synopsis for help text
    fn usage(&self) -> &'static str {
        ""
    }

    /// Aliases for this command (e.g., ["q"] for quit)
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Execute the command
    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult>;
}

// ============================================================================
// Command Registry
// ============================================================================

/// Registry of slash commands
pub struct CommandRegistry {
    commands: Vec<Arc<dyn SlashCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Create a new registry with all built-in commands
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn SlashCommand>> = vec![
            Arc::new(HelpCommand),
            Arc::new(LoginCommand),
            Arc::new(LogoutCommand),
            Arc::new(WhoamiCommand),
            Arc::new(DisksCommand),
            Arc::new(DiskCommand),
            Arc::new(PartCommand),
            Arc::new(LsCommand),
            Arc::new(CdCommand),
            Arc::new(BackCommand),
            Arc::new(TopCommand),
            Arc::new(CatCommand),
            Arc::new(JournalCommand),
            Arc::new(LoadCommand),
            Arc::new(EditCommand),
            Arc::new(InputCommand),
            Arc::new(RunCommand),
            Arc::new(ClearCommand),
            Arc::new(ExitCommand),
        ];

        Self { commands }
    }

    /// Look up a command by name or alias, ignoring case
    pub fn find(&self, name: &str) -> Option<&Arc<dyn SlashCommand>> {
        let matches = |candidate: &str| candidate.eq_ignore_ascii_case(name);
        self.commands
            .iter()
            .find(|cmd| matches(cmd.name()) || cmd.aliases().iter().copied().any(matches))
    }

    /// Lines starting with `/` are console commands, everything else goes to the engine
    pub fn is_command(input: &str) -> bool {
        input.starts_with('/')
    }

    /// Split `/name args...` into the name and the trimmed argument string
    pub fn parse_command(input: &str) -> Option<(&str, &str)> {
        let rest = input.strip_prefix('/')?;
        let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        Some((name, args.trim()))
    }

    /// Get all registered commands
    pub fn all_commands(&self) -> &[Arc<dyn SlashCommand>] {
        &self.commands
    }

    /// Run `input` if it is a slash command; `None` for engine input
    pub async fn try_execute(
        &self,
        input: &str,
        ctx: &mut CommandContext<'_>,
    ) -> Option<Result<CommandResult>> {
        let (name, args) = Self::parse_command(input)?;

        let Some(cmd) = self.find(name) else {
            return Some(Ok(CommandResult::Message(format!(
                "Unknown command: /{}. Type /help for available commands.",
                name
            ))));
        };

        tracing::debug!(command = cmd.name(), args, "running console command");
        Some(cmd.execute(args, ctx).await)
    }
}

// ============================================================================
// Tests
// ============================================================================
