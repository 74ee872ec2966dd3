//! Text console: input buffer, batch submission and engine output

use std::path::Path;

use anyhow::{Context, Result};
use engine_client::EngineApi;

use crate::error::{ClientError, ClientResult};
use crate::gate::{CommandBatch, CommandGate};
use crate::session::Session;

/// A gated batch ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteTicket {
    pub batch: CommandBatch,
}

/// Engine answer to an [`ExecuteTicket`]
#[derive(Debug, Clone)]
pub struct ExecuteOutcome {
    /// Number of command lines that were sent
    pub commands: usize,
    pub result: ClientResult<String>,
}

impl ExecuteTicket {
    pub async fn fetch(self, api: &dyn EngineApi) -> ExecuteOutcome {
        let payload = self.batch.payload();
        tracing::debug!(commands = self.batch.len(), bytes = payload.len(), "submitting batch");

        let result = api.execute(&payload).await.map_err(ClientError::from);
        ExecuteOutcome {
            commands: self.batch.len(),
            result,
        }
    }
}

/// Last thing shown in the output pane
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConsoleOutput {
    #[default]
    Empty,
    /// Text returned by the engine
    Engine(String),
    /// Local or remote failure
    Error(ClientError),
}

impl ConsoleOutput {
    pub fn text(&self) -> String {
        match self {
            ConsoleOutput::Empty => String::new(),
            ConsoleOutput::Engine(text) => text.clone(),
            ConsoleOutput::Error(err) => format!("Error: {}", err),
        }
    }
}

/// Editable batch text plus the most recent output
#[derive(Debug, Default)]
pub struct CommandConsole {
    gate: CommandGate,
    input: String,
    output: ConsoleOutput,
    in_flight: usize,
}

impl CommandConsole {
    pub fn new(gate: CommandGate) -> Self {
        Self {
            gate,
            ..Self::default()
        }
    }

    pub fn gate(&self) -> &CommandGate {
        &self.gate
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Add one line to the end of the input
    pub fn append_line(&mut self, line: &str) {
        if !self.input.is_empty() && !self.input.ends_with('\n') {
            self.input.push('\n');
        }
        self.input.push_str(line);
        self.input.push('\n');
    }

    /// Replace the input with the raw contents of a script file
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        let size = content.len();
        tracing::info!(path = %path.display(), bytes = size, "script loaded");
        self.input = content;
        Ok(size)
    }

    pub fn output(&self) -> &ConsoleOutput {
        &self.output
    }

    /// Number of submitted batches still awaiting an answer
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Wipe both input and output
    pub fn clear(&mut self) {
        self.input.clear();
        self.output = ConsoleOutput::Empty;
    }

    /// Gate the input buffer
    pub fn submit_input(&mut self, session: &Session) -> ClientResult<ExecuteTicket> {
        let text = self.input.clone();
        self.submit(&text, session)
    }

    /// Gate `text`; a rejection is recorded as output and nothing is sent
    pub fn submit(&mut self, text: &str, session: &Session) -> ClientResult<ExecuteTicket> {
        match self.gate.check(text, session) {
            Ok(batch) => {
                self.in_flight += 1;
                Ok(ExecuteTicket { batch })
            }
            Err(err) => {
                let err = ClientError::from(err);
                self.output = ConsoleOutput::Error(err.clone());
                Err(err)
            }
        }
    }

    /// Record the engine's answer
    pub fn finish(&mut self, outcome: &ExecuteOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.output = match &outcome.result {
            Ok(text) => ConsoleOutput::Engine(text.clone()),
            Err(err) => {
                tracing::warn!(error = %err, "batch failed");
                ConsoleOutput::Error(err.clone())
            }
        };
    }
}
