//! Session commands - log in and out

use super::{CommandContext, CommandResult, SlashCommand};
use crate::output::OutputEvent;
use anyhow::Result;
use async_trait::async_trait;

/// Authenticate against the engine
pub struct LoginCommand;

#[async_trait]
impl SlashCommand for LoginCommand {
    fn name(&self) -> &'static str {
        "login"
    }

    fn description(&self) -> &'static str {
        "Log in to a mounted partition"
    }

    fn usage(&self) -> &'static str {
        "<user> <pass> <id>"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let mut fields = args.split_whitespace();
        let user = fields.next().unwrap_or_default();
        let pass = fields.next().unwrap_or_default();
        let id = fields.next().unwrap_or_default();

        match ctx.workbench.login(user, pass, id) {
            Ok(()) => {
                ctx.output.write(OutputEvent::Progress {
                    message: format!("authenticating {}...", user),
                    done: false,
                });
                Ok(CommandResult::Pending)
            }
            Err(err) => Ok(CommandResult::Message(format!(
                "{} (usage: /login {})",
                err,
                self.usage()
            ))),
        }
    }
}

/// End the session
pub struct LogoutCommand;

#[async_trait]
impl SlashCommand for LogoutCommand {
    fn name(&self) -> &'static str {
        "logout"
    }

    fn description(&self) -> &'static str {
        "End the session and leave the current disk"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if !ctx.workbench.session().is_authenticated {
            return Ok(CommandResult::Message("Not logged in".to_string()));
        }
        ctx.workbench.logout();
        Ok(CommandResult::Message("Logged out".to_string()))
    }
}

/// Show the current user
pub struct WhoamiCommand;

#[async_trait]
impl SlashCommand for WhoamiCommand {
    fn name(&self) -> &'static str {
        "whoami"
    }

    fn description(&self) -> &'static str {
        "Show who is logged in"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let session = ctx.workbench.session();
        let message = if session.is_authenticated {
            session.username.clone()
        } else {
            "Not logged in".to_string()
        };
        Ok(CommandResult::Message(message))
    }
}
