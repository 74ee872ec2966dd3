//! Help and exit commands

use super::{CommandContext, CommandRegistry, CommandResult, SlashCommand};
use crate::output::OutputEvent;
use anyhow::Result;
use async_trait::async_trait;

/// Help command
pub struct HelpCommand;

#[async_trait]
impl SlashCommand for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "Show available commands"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["h", "?"]
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let registry = CommandRegistry::new();
        let allowed = ctx.workbench.console().gate().allowed().join(", ");
        ctx.output.write(OutputEvent::Text(help_text(&registry, &allowed)));
        Ok(CommandResult::Ok)
    }
}

/// Leave the console
pub struct ExitCommand;

#[async_trait]
impl SlashCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn description(&self) -> &'static str {
        "Leave the console"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["quit", "q"]
    }

    async fn execute(&self, _args: &str, _ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        Ok(CommandResult::Exit)
    }
}

fn help_text(registry: &CommandRegistry, allowed: &str) -> String {
    let mut help_text = String::from("Available commands:\n\n");

    for cmd in registry.all_commands() {
        let aliases = cmd.aliases();
        let alias_str = if aliases.is_empty() {
            String::new()
        } else {
            format!(
                " ({})",
                aliases.iter().map(|a| format!("/{}", a)).collect::<Vec<_>>().join(", ")
            )
        };
        let synopsis = format!("/{} {}", cmd.name(), cmd.usage());

        help_text.push_str(&format!(
            "  {:<24} {}{}\n",
            synopsis.trim_end(),
            cmd.description(),
            alias_str
        ));
    }

    help_text.push_str("\nAny other line is sent to the engine as a command batch.\n");
    help_text.push_str(&format!("Allowed without login: {}\n", allowed));
    help_text
}
