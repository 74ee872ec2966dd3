//! Clear command - clear the console buffers and/or screen

use super::{CommandContext, CommandResult, SlashCommand};
use crate::output::OutputEvent;
use anyhow::Result;
use async_trait::async_trait;

/// Clear command
pub struct ClearCommand;

#[async_trait]
impl SlashCommand for ClearCommand {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn description(&self) -> &'static str {
        "Clear console input and output"
    }

    fn usage(&self) -> &'static str {
        "[screen|all]"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["c"]
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        match args.trim() {
            "" => {
                ctx.workbench.console_mut().clear();
                ctx.output
                    .write(OutputEvent::Status("Input and output cleared".to_string()));
                Ok(CommandResult::Ok)
            }

            "screen" => {
                print!("\x1B[2J\x1B[H");
                Ok(CommandResult::Ok)
            }

            "all" => {
                ctx.workbench.console_mut().clear();
                print!("\x1B[2J\x1B[H");
                Ok(CommandResult::Ok)
            }

            _ => {
                ctx.output.write(OutputEvent::Warning(
                    "Usage: /clear [screen|all]".to_string(),
                ));
                Ok(CommandResult::Ok)
            }
        }
    }
}
