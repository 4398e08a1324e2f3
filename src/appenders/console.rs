//! Console appender implementation

use crate::core::{Appender, LogRecord, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Standard stream a console sink writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    Stdout,
    #[default]
    Stderr,
}

pub struct ConsoleAppender {
    stream: ConsoleStream,
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new(stream: ConsoleStream) -> Self {
        Self {
            stream,
            use_colors: false,
        }
    }

    /// Color each line by its level
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_router::appenders::{ConsoleAppender, ConsoleStream};
    ///
    /// let appender = ConsoleAppender::new(ConsoleStream::Stdout).with_colors(true);
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new(ConsoleStream::default())
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &LogRecord, rendered: &str) -> Result<()> {
        let line = if self.use_colors {
            rendered.color(record.level.color_code()).to_string()
        } else {
            rendered.to_string()
        };

        // Locking the stream keeps the line whole when other threads print too
        match self.stream {
            ConsoleStream::Stdout => writeln!(std::io::stdout().lock(), "{}", line)?,
            ConsoleStream::Stderr => writeln!(std::io::stderr().lock(), "{}", line)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
