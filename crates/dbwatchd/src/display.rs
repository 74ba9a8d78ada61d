//! Console rendering of the display model

use clap::ValueEnum;
use dbwatch_api::DisplayState;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisplayFormat {
    /// One human-readable line per change
    Text,
    /// One JSON object per change
    Json,
}

/// Writes the display to stdout whenever it changes
pub struct ConsoleDisplay {
    format: DisplayFormat,
    last: Option<DisplayState>,
}

impl ConsoleDisplay {
    pub fn new(format: DisplayFormat) -> Self {
        Self { format, last: None }
    }

    /// Render `state` unless it equals what was rendered last
    pub fn render(&mut self, state: &DisplayState) {
        if self.last.as_ref() == Some(state) {
            return;
        }

        let line = format_line(self.format, state);
        let mut stdout = std::io::stdout().lock();
        // A closed stdout must not take the monitor down
        let _ = writeln!(stdout, "{}", line);
        let _ = stdout.flush();

        self.last = Some(state.clone());
    }
}

fn format_line(format: DisplayFormat, state: &DisplayState) -> String {
    match format {
        DisplayFormat::Text => state.lines().join(" | "),
        DisplayFormat::Json => {
            serde_json::to_string(state).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
        }
    }
}
