//! REPL (Read-Eval-Print Loop) for the interactive console
//!
//! Reads lines from stdin and completion events from the workbench at the
//! same time, so the prompt stays usable while listings load.

use std::io::{self, Write};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use super::commands::{CommandContext, CommandRegistry, CommandResult};
use crate::output::{OutputEvent, OutputWriter};
use crate::render;
use crate::workbench::{Event, Update, Workbench};

/// Interactive console
pub struct Repl<'a> {
    workbench: Workbench,
    output: &'a dyn OutputWriter,
    command_registry: CommandRegistry,
    /// Typed lines are appended to the input buffer instead of sent
    composing: bool,
}

impl<'a> Repl<'a> {
    /// Create a new REPL
    pub fn new(workbench: Workbench, output: &'a dyn OutputWriter) -> Self {
        Self {
            workbench,
            output,
            command_registry: CommandRegistry::new(),
            composing: false,
        }
    }

    pub fn workbench(&self) -> &Workbench {
        &self.workbench
    }

    pub fn workbench_mut(&mut self) -> &mut Workbench {
        &mut self.workbench
    }

    /// Run the REPL loop until `quit`, `/exit` or end of input
    pub async fn run(&mut self, events: &mut UnboundedReceiver<Event>) -> Result<()> {
        self.output.write(OutputEvent::System(
            "diskctl console. Type /help for commands, 'quit' to exit.".to_string(),
        ));
        self.output.write(OutputEvent::NewLine);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.prompt()?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if !self.handle_line(&line).await {
                        break;
                    }
                    self.prompt()?;
                }
                Some(event) = events.recv() => {
                    self.handle_event(event);
                    self.prompt()?;
                }
            }
        }

        self.output.flush();
        Ok(())
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Handle one line of input; returns false when the user asked to leave
    pub async fn handle_line(&mut self, line: &str) -> bool {
        let input = line.trim();

        if self.composing {
            if input.is_empty() {
                self.finish_composing();
                return true;
            }
            if !CommandRegistry::is_command(input) {
                self.workbench.console_mut().append_line(line.trim_end());
                return true;
            }
            self.finish_composing();
        }

        if input.is_empty() {
            return true;
        }

        if input == "quit" || input == "exit" {
            return false;
        }

        if CommandRegistry::is_command(input) {
            return self.handle_command(input).await;
        }

        self.submit(input);
        true
    }

    /// Render a finished remote call
    pub fn handle_event(&mut self, event: Event) {
        let update = self.workbench.apply(event);
        for event in render::update(&update, &self.workbench) {
            self.output.write(event);
        }
        self.output.flush();

        // A fresh session starts at the disk list
        if let Update::Login { result: Ok(_), .. } = update {
            self.workbench.refresh_disks();
        }
    }

    /// Handle a slash command
    async fn handle_command(&mut self, input: &str) -> bool {
        let mut ctx = CommandContext {
            workbench: &mut self.workbench,
            output: self.output,
        };

        let result = match self.command_registry.try_execute(input, &mut ctx).await {
            Some(result) => result,
            None => return true,
        };

        match result {
            Ok(CommandResult::Exit) => return false,
            Ok(CommandResult::Message(msg)) => {
                self.output.write(OutputEvent::Text(msg));
            }
            Ok(CommandResult::Compose) => self.composing = true,
            Ok(CommandResult::Pending) | Ok(CommandResult::Ok) => {}
            Err(e) => {
                self.output
                    .write(OutputEvent::Error(format!("Command error: {:#}", e)));
            }
        }
        true
    }

    fn finish_composing(&mut self) {
        self.composing = false;
        let lines = self.workbench.console().input().lines().count();
        self.output.write(OutputEvent::Status(format!(
            "Input buffer has {} lines. Review with /input, submit with /run.",
            lines
        )));
    }

    /// Send a typed line to the engine as a one-line batch
    fn submit(&mut self, input: &str) {
        match self.workbench.execute(input) {
            Ok(commands) => self.output.write(OutputEvent::Progress {
                message: format!("executing {} command(s)...", commands),
                done: false,
            }),
            Err(err) => self.output.write(OutputEvent::Error(err.to_string())),
        }
    }

    fn prompt(&self) -> Result<()> {
        let mut stdout = io::stdout();
        let prompt = if self.composing {
            let next = self.workbench.console().input().lines().count() + 1;
            format!("{:>4}| ", next)
        } else {
            render::prompt(self.workbench.session(), self.workbench.navigator())
        };
        if self.workbench.in_flight() > 0 {
            print!("[{} pending] {}", self.workbench.in_flight(), prompt);
        } else {
            print!("{}", prompt);
        }
        stdout.flush()?;
        Ok(())
    }
}
