//! Eligibility check for command batches
//!
//! The gate never interprets commands. It splits the operator's text into
//! lines, reads the leading token of each, and decides whether the whole
//! batch may be forwarded given the current session. Rejection is
//! all-or-nothing.

use crate::error::ValidationError;
use crate::session::Session;

/// Commands that manipulate disk topology and may run without a session
pub const ALLOWED_WITHOUT_SESSION: &[&str] = &["mkdisk", "rmdisk", "fdisk", "mount", "unmount", "mkfs"];

/// Commands that establish a session and therefore can never require one
const SESSION_BOOTSTRAP: &[&str] = &["login"];

/// One non-empty line of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// 1-based line number in the submitted text
    pub number: usize,
    /// Lowercased leading token
    pub name: String,
    /// The trimmed line as it will be forwarded
    pub text: String,
}

/// A batch of lines that passed local validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBatch {
    lines: Vec<CommandLine>,
}

impl CommandBatch {
    /// Split `text` into trimmed, non-empty lines
    ///
    /// Fails with [`ValidationError::EmptyInput`] when there is nothing but
    /// whitespace.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let lines: Vec<CommandLine> = text
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let trimmed = raw.trim();
                let token = trimmed.split_whitespace().next()?;
                Some(CommandLine {
                    number: idx + 1,
                    name: token.to_lowercase(),
                    text: trimmed.to_string(),
                })
            })
            .collect();

        if lines.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[CommandLine] {
        &self.lines
    }

    /// Number of command lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The newline-joined text sent to the engine
    pub fn payload(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Decides which batches may be submitted for a given session
#[derive(Debug, Clone)]
pub struct CommandGate {
    allowed: Vec<String>,
}

impl Default for CommandGate {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandGate {
    /// Gate with the standard allow-list
    pub fn new() -> Self {
        Self::with_allowed(ALLOWED_WITHOUT_SESSION.iter().copied())
    }

    /// Gate with a custom allow-list
    pub fn with_allowed<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Commands permitted without a session, in display order
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Whether `command` may run without a session (case-insensitive)
    pub fn permits_without_session(&self, command: &str) -> bool {
        let command = command.to_lowercase();
        SESSION_BOOTSTRAP.contains(&command.as_str()) || self.allowed.iter().any(|a| *a == command)
    }

    /// Validate `text` against `session`
    ///
    /// Returns the batch to forward, or the first offending command.
    pub fn check(&self, text: &str, session: &Session) -> Result<CommandBatch, ValidationError> {
        let batch = CommandBatch::parse(text)?;

        if session.is_authenticated {
            return Ok(batch);
        }

        for line in batch.lines() {
            let name = line.name.as_str();
            if !self.permits_without_session(name) {
                tracing::debug!(command = name, line = line.number, "batch rejected by gate");
                return Err(ValidationError::RequiresSession {
                    command: name.to_string(),
                    line: line.number,
                    allowed: self.allowed.join(", "),
                });
            }
        }

        Ok(batch)
    }
}
