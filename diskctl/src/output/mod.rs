//! Output abstraction for the console and one-shot commands
//!
//! Callers emit [`OutputEvent`]s; a writer decides how they look. The
//! terminal writer adds colour, the plain writer is for pipes and CI.

mod plain;
mod terminal;

pub use plain::PlainOutput;
pub use terminal::TerminalOutput;

// ============================================================================
// Output Events
// ============================================================================

/// Events that can be displayed to the user
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// Plain content line(s)
    Text(String),

    /// Title above a listing
    Heading(String),

    /// Text produced by the engine for a command batch
    Engine(String),

    /// A remote call started or finished
    Progress { message: String, done: bool },

    /// Status message (informational)
    Status(String),

    /// Error message
    Error(String),

    /// Warning message
    Warning(String),

    /// System message (dimmed, for internal info)
    System(String),

    /// New line / separator
    NewLine,
}

// ============================================================================
// Output Writer Trait
// ============================================================================

/// Trait for writing output events
pub trait OutputWriter: Send + Sync {
    /// Write an output event
    fn write(&self, event: OutputEvent);

    /// Flush any buffered output
    fn flush(&self);

    /// Whether this writer supports colors/formatting
    fn supports_colors(&self) -> bool {
        false
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pick a writer for stdout; colours only on a TTY and when enabled
pub fn default_output(colors: bool) -> Box<dyn OutputWriter> {
    if colors && atty::is(atty::Stream::Stdout) {
        Box::new(TerminalOutput::new())
    } else {
        Box::new(PlainOutput::new())
    }
}

// ============================================================================
// Tests
// ============================================================================
