//! Browse commands - disks, partitions and directories

use super::{CommandContext, CommandResult, SlashCommand};
use crate::error::{ClientError, ValidationError};
use crate::output::OutputEvent;
use crate::render;
use anyhow::Result;
use async_trait::async_trait;

/// Browsing is only offered inside a session
pub(super) fn require_session(ctx: &CommandContext<'_>) -> Option<CommandResult> {
    if ctx.workbench.session().is_authenticated {
        None
    } else {
        Some(CommandResult::Message(
            ValidationError::NotAuthenticated.to_string(),
        ))
    }
}

fn failed(err: ClientError) -> Result<CommandResult> {
    Ok(CommandResult::Message(err.to_string()))
}

/// Refresh the disk list
pub struct DisksCommand;

#[async_trait]
impl SlashCommand for DisksCommand {
    fn name(&self) -> &'static str {
        "disks"
    }

    fn description(&self) -> &'static str {
        "List disks"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }
        ctx.workbench.refresh_disks();
        Ok(CommandResult::Pending)
    }
}

/// Select a disk
pub struct DiskCommand;

#[async_trait]
impl SlashCommand for DiskCommand {
    fn name(&self) -> &'static str {
        "disk"
    }

    fn description(&self) -> &'static str {
        "Select a disk and list its partitions"
    }

    fn usage(&self) -> &'static str {
        "<name|path|#>"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }
        if args.is_empty() {
            return Ok(CommandResult::Message(format!("Usage: /disk {}", self.usage())));
        }

        match ctx.workbench.select_disk_by_key(args) {
            Ok(_) => Ok(CommandResult::Pending),
            Err(err) => failed(err),
        }
    }
}

/// Select a partition of the selected disk
pub struct PartCommand;

#[async_trait]
impl SlashCommand for PartCommand {
    fn name(&self) -> &'static str {
        "part"
    }

    fn description(&self) -> &'static str {
        "Select a partition and browse its root"
    }

    fn usage(&self) -> &'static str {
        "<id|name|#>"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["partition"]
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }
        if args.is_empty() {
            ctx.emit(render::partitions(ctx.workbench.navigator()));
            return Ok(CommandResult::Ok);
        }

        match ctx.workbench.select_partition_by_key(args) {
            Ok(_) => Ok(CommandResult::Pending),
            Err(err) => failed(err),
        }
    }
}

/// Re-list whatever is being browsed
pub struct LsCommand;

#[async_trait]
impl SlashCommand for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn description(&self) -> &'static str {
        "Refresh the current listing"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["refresh"]
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }
        ctx.workbench.refresh();
        Ok(CommandResult::Pending)
    }
}

/// Enter a folder, or go back with `..`
pub struct CdCommand;

#[async_trait]
impl SlashCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn description(&self) -> &'static str {
        "Enter a folder of the current directory"
    }

    fn usage(&self) -> &'static str {
        "<folder|..>"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }

        match args {
            "" => Ok(CommandResult::Message(format!("Usage: /cd {}", self.usage()))),
            ".." => Ok(go_back(ctx)),
            name => match ctx.workbench.enter_folder(name) {
                Ok(()) => Ok(CommandResult::Pending),
                Err(err) => failed(err),
            },
        }
    }
}

/// Return to the previous directory
pub struct BackCommand;

#[async_trait]
impl SlashCommand for BackCommand {
    fn name(&self) -> &'static str {
        "back"
    }

    fn description(&self) -> &'static str {
        "Go back to the previous directory"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &[".."]
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }
        Ok(go_back(ctx))
    }
}

fn go_back(ctx: &mut CommandContext<'_>) -> CommandResult {
    if ctx.workbench.navigator().selected_partition().is_none() {
        return CommandResult::Message(ValidationError::NoPartitionSelected.to_string());
    }
    if ctx.workbench.go_back() {
        CommandResult::Pending
    } else {
        CommandResult::Message("Already at /".to_string())
    }
}

/// Leave the selected disk
pub struct TopCommand;

#[async_trait]
impl SlashCommand for TopCommand {
    fn name(&self) -> &'static str {
        "top"
    }

    fn description(&self) -> &'static str {
        "Back to the disk list"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }
        ctx.workbench.back_to_disks();
        let nav = ctx.workbench.navigator();
        ctx.emit(render::disks(nav.disks().view(), nav.selected_disk()));
        Ok(CommandResult::Ok)
    }
}

/// Show a file of the current directory
pub struct CatCommand;

#[async_trait]
impl SlashCommand for CatCommand {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn description(&self) -> &'static str {
        "Show the content of a file in the current directory"
    }

    fn usage(&self) -> &'static str {
        "<file>"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        if let Some(denied) = require_session(ctx) {
            return Ok(denied);
        }

        let entry = ctx
            .workbench
            .navigator()
            .entries()
            .items()
            .iter()
            .find(|entry| !entry.is_folder() && entry.name == args)
            .cloned();

        match entry {
            Some(entry) => {
                ctx.emit(render::file(&entry));
                Ok(CommandResult::Ok)
            }
            None => {
                ctx.output.write(OutputEvent::Warning(format!(
                    "'{}' is not a file in the current directory",
                    args
                )));
                Ok(CommandResult::Ok)
            }
        }
    }
}
