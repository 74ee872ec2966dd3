//! Script commands - load, inspect and run the input buffer

use std::path::Path;

use super::{CommandContext, CommandResult, SlashCommand};
use crate::output::OutputEvent;
use anyhow::Result;
use async_trait::async_trait;

/// Load a script file into the input buffer
pub struct LoadCommand;

#[async_trait]
impl SlashCommand for LoadCommand {
    fn name(&self) -> &'static str {
        "load"
    }

    fn description(&self) -> &'static str {
        "Load a script file into the input buffer"
    }

    fn usage(&self) -> &'static str {
        "<file>"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if args.is_empty() {
            return Ok(CommandResult::Message(format!("Usage: /load {}", self.usage())));
        }

        let size = ctx.workbench.console_mut().load_file(Path::new(args))?;
        let lines = ctx.workbench.console().input().lines().count();
        ctx.output.write(OutputEvent::Status(format!(
            "Loaded {} ({} bytes, {} lines). Review with /input, submit with /run.",
            args, size, lines
        )));
        Ok(CommandResult::Ok)
    }
}

/// Start composing the input buffer at the prompt
pub struct EditCommand;

#[async_trait]
impl SlashCommand for EditCommand {
    fn name(&self) -> &'static str {
        "edit"
    }

    fn description(&self) -> &'static str {
        "Type lines into the input buffer until a blank line"
    }

    fn usage(&self) -> &'static str {
        "[new]"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        match args {
            "" => {}
            "new" => ctx.workbench.console_mut().set_input(String::new()),
            _ => return Ok(CommandResult::Message(format!("Usage: /edit {}", self.usage()))),
        }

        let lines = ctx.workbench.console().input().lines().count();
        ctx.output.write(OutputEvent::Status(format!(
            "Composing after line {}. End with a blank line, or submit with /run.",
            lines
        )));
        Ok(CommandResult::Compose)
    }
}

/// Show the input buffer
pub struct InputCommand;

#[async_trait]
impl SlashCommand for InputCommand {
    fn name(&self) -> &'static str {
        "input"
    }

    fn description(&self) -> &'static str {
        "Show the input buffer"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let input = ctx.workbench.console().input();
        if input.trim().is_empty() {
            return Ok(CommandResult::Message("Input buffer is empty".to_string()));
        }

        let numbered = input
            .lines()
            .enumerate()
            .map(|(i, line)| format!("{:>4}  {}", i + 1, line))
            .collect::<Vec<_>>()
            .join("\n");
        ctx.output.write(OutputEvent::Text(numbered));
        Ok(CommandResult::Ok)
    }
}

/// Submit the input buffer as one batch
pub struct RunCommand;

#[async_trait]
impl SlashCommand for RunCommand {
    fn name(&self) -> &'static str {
        "run"
    }

    fn description(&self) -> &'static str {
        "Submit the input buffer to the engine"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["r"]
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        match ctx.workbench.execute_input() {
            Ok(commands) => {
                ctx.output.write(OutputEvent::Progress {
                    message: format!("executing {} command(s)...", commands),
                    done: false,
                });
                Ok(CommandResult::Pending)
            }
            Err(err) => Ok(CommandResult::Message(format!("Error: {}", err))),
        }
    }
}
