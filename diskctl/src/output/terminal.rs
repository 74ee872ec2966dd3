//! Terminal output with colors and formatting
//!
//! Uses ANSI escape codes for colors and styling.

use std::io::{self, Write};

use super::{OutputEvent, OutputWriter};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";

/// Terminal output writer with colors and formatting
#[derive(Debug)]
pub struct TerminalOutput {
    /// Whether to use colors (can be disabled)
    use_colors: bool,
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// Format with color if colors are enabled
    fn color(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Format with multiple styles
    fn styled(&self, codes: &[&str], text: &str) -> String {
        if self.use_colors {
            let prefix: String = codes.iter().copied().collect();
            format!("{}{}{}", prefix, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Listing rows marked `*` are the current selection
    fn highlight_selected(&self, text: &str) -> String {
        text.lines()
            .map(|line| {
                if line.starts_with('*') {
                    self.styled(&[BOLD, GREEN], line)
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Prefix every line of engine output with a gutter
    fn gutter(&self, text: &str) -> String {
        let bar = self.color(GRAY, "│");
        text.lines()
            .map(|line| format!("{} {}", bar, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputWriter for TerminalOutput {
    fn write(&self, event: OutputEvent) {
        match event {
            OutputEvent::Text(text) => {
                println!("{}", self.highlight_selected(&text));
            }

            OutputEvent::Heading(title) => {
                println!("{}", self.styled(&[BOLD, CYAN], &title));
            }

            OutputEvent::Engine(text) => {
                println!("{}", self.gutter(&text));
            }

            OutputEvent::Progress { message, done } => {
                let marker = if done {
                    self.color(GREEN, "✓")
                } else {
                    self.color(BLUE, "⋯")
                };
                eprintln!("  {} {}", marker, self.color(GRAY, &message));
            }

            OutputEvent::Status(msg) => {
                eprintln!("{}", self.color(GRAY, &format!("  {}", msg)));
            }

            OutputEvent::Error(msg) => {
                eprintln!(
                    "{} {}",
                    self.styled(&[BOLD, RED], "Error:"),
                    self.color(RED, &msg)
                );
            }

            OutputEvent::Warning(msg) => {
                eprintln!(
                    "{} {}",
                    self.styled(&[BOLD, YELLOW], "Warning:"),
                    self.color(YELLOW, &msg)
                );
            }

            OutputEvent::System(msg) => {
                eprintln!("{}", self.color(GRAY, &msg));
            }

            OutputEvent::NewLine => {
                println!();
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }

    fn supports_colors(&self) -> bool {
        self.use_colors
    }
}
