//! Journal command - show a partition's operation log

use super::browse::require_session;
use super::{CommandContext, CommandResult, SlashCommand};
use anyhow::Result;
use async_trait::async_trait;

/// Journal command
pub struct JournalCommand;

#[async_trait]
impl SlashCommand for JournalCommand {
    fn name(&self) -> &'static str {
        "journal"
    }

    fn description(&self) -> &'static str {
        "Show the journal of a partition (default: selected or login partition)"
    }

    fn usage(&self) -> &'static str {
        "[id]"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["j"]
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }

        let id = (!args.is_empty()).then_some(args);
        match ctx.workbench.show_journal(id) {
            Ok(()) => Ok(CommandResult::Pending),
            Err(err) => Ok(CommandResult::Message(err.to_string())),
        }
    }
}
