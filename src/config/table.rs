//! Declarative logging table
//!
//! The table mirrors the classic `formatters` / `handlers` / `loggers`
//! layout. It can be written in TOML or assembled in code (see
//! [`profile`](super::profile)), and is turned into a [`LoggingRouter`] by
//! [`LoggingConfig::build_router`].

use crate::appenders::{ConsoleAppender, ConsoleStream, FileAppender, RemoteAppender};
use crate::core::{
    Appender, FieldStyle, Formatter, LogLevel, LoggerError, LoggerSpec, LoggingRouter,
    OutputFormat, Result, TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The only table layout version understood
pub const CONFIG_VERSION: u32 = 1;

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_true() -> bool {
    true
}

fn default_handler_level() -> LogLevel {
    LogLevel::Debug
}

fn default_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub formatters: BTreeMap<String, FormatterConfig>,
    #[serde(default)]
    pub handlers: BTreeMap<String, HandlerConfig>,
    #[serde(default)]
    pub loggers: BTreeMap<String, LoggerConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            formatters: BTreeMap::new(),
            handlers: BTreeMap::new(),
            loggers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterConfig {
    pub format: String,
    #[serde(default)]
    pub style: FieldStyle,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default)]
    pub datefmt: Option<String>,
}

impl FormatterConfig {
    pub fn new(format: impl Into<String>, style: FieldStyle) -> Self {
        Self {
            format: format.into(),
            style,
            output: OutputFormat::Text,
            datefmt: None,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn compile(&self, name: &str) -> Result<Formatter> {
        let mut formatter =
            Formatter::parse(name, &self.format, self.style)?.with_output_format(self.output);
        if let Some(ref datefmt) = self.datefmt {
            let timestamp = TimestampFormat::from_datefmt(datefmt)
                .map_err(|message| LoggerError::formatter(name, message))?;
            formatter = formatter.with_timestamp_format(timestamp);
        }
        Ok(formatter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HandlerTable", into = "HandlerTable")]
pub struct HandlerConfig {
    pub level: LogLevel,
    pub formatter: Option<String>,
    pub sink: SinkKind,
}

impl HandlerConfig {
    pub fn new(sink: SinkKind) -> Self {
        Self {
            level: default_handler_level(),
            formatter: None,
            sink,
        }
    }

    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }
}

/// Closed set of sink kinds, each with only the settings it needs
#[derive(Debug, Clone, PartialEq)]
pub enum SinkKind {
    Console {
        stream: ConsoleStream,
        colors: bool,
    },
    File {
        path: PathBuf,
        append: bool,
        lock: bool,
    },
    Remote {
        url: String,
        token: Option<String>,
        timeout_ms: u64,
    },
}

/// On-disk shape of one `[handlers.<name>]` table
///
/// Keys are checked per kind, so a misspelled key is a parse error instead
/// of a silently applied default.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
enum HandlerTable {
    Console {
        #[serde(default = "default_handler_level")]
        level: LogLevel,
        #[serde(default)]
        formatter: Option<String>,
        #[serde(default)]
        stream: ConsoleStream,
        #[serde(default)]
        colors: bool,
    },
    File {
        #[serde(default = "default_handler_level")]
        level: LogLevel,
        #[serde(default)]
        formatter: Option<String>,
        path: PathBuf,
        #[serde(default = "default_true")]
        append: bool,
        #[serde(default)]
        lock: bool,
    },
    Remote {
        #[serde(default = "default_handler_level")]
        level: LogLevel,
        #[serde(default)]
        formatter: Option<String>,
        url: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

impl From<HandlerTable> for HandlerConfig {
    fn from(table: HandlerTable) -> Self {
        let (level, formatter, sink) = match table {
            HandlerTable::Console {
                level,
                formatter,
                stream,
                colors,
            } => (level, formatter, SinkKind::Console { stream, colors }),
            HandlerTable::File {
                level,
                formatter,
                path,
                append,
                lock,
            } => (level, formatter, SinkKind::File { path, append, lock }),
            HandlerTable::Remote {
                level,
                formatter,
                url,
                token,
                timeout_ms,
            } => (
                level,
                formatter,
                SinkKind::Remote {
                    url,
                    token,
                    timeout_ms,
                },
            ),
        };
        Self {
            level,
            formatter,
            sink,
        }
    }
}

impl From<HandlerConfig> for HandlerTable {
    fn from(config: HandlerConfig) -> Self {
        let HandlerConfig {
            level,
            formatter,
            sink,
        } = config;
        match sink {
            SinkKind::Console { stream, colors } => HandlerTable::Console {
                level,
                formatter,
                stream,
                colors,
            },
            SinkKind::File { path, append, lock } => HandlerTable::File {
                level,
                formatter,
                path,
                append,
                lock,
            },
            SinkKind::Remote {
                url,
                token,
                timeout_ms,
            } => HandlerTable::Remote {
                level,
                formatter,
                url,
                token,
                timeout_ms,
            },
        }
    }
}

impl SinkKind {
    pub fn console(stream: ConsoleStream) -> Self {
        SinkKind::Console {
            stream,
            colors: false,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        SinkKind::File {
            path: path.into(),
            append: true,
            lock: false,
        }
    }

    pub fn remote(url: impl Into<String>, token: Option<String>) -> Self {
        SinkKind::Remote {
            url: url.into(),
            token,
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Open the destination; failures here are startup errors
    fn open(&self, formatter: Option<&Formatter>) -> Result<Box<dyn Appender>> {
        let appender: Box<dyn Appender> = match self {
            SinkKind::Console { stream, colors } => {
                Box::new(ConsoleAppender::new(*stream).with_colors(*colors))
            }
            SinkKind::File { path, append, lock } => {
                Box::new(FileAppender::new(path.clone(), *append)?.with_locking(*lock))
            }
            SinkKind::Remote {
                url,
                token,
                timeout_ms,
            } => {
                if *timeout_ms == 0 {
                    return Err(LoggerError::config("remote sink", "timeout_ms must be positive"));
                }
                let content_type = formatter
                    .map(Formatter::content_type)
                    .unwrap_or("text/plain; charset=utf-8");
                Box::new(
                    RemoteAppender::new(url, token.clone(), Duration::from_millis(*timeout_ms))?
                        .with_content_type(content_type),
                )
            }
        };
        Ok(appender)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    #[serde(default)]
    pub level: Option<LogLevel>,
    #[serde(default)]
    pub handlers: Vec<String>,
    #[serde(default = "default_true")]
    pub propagate: bool,
}

impl LoggerConfig {
    pub fn new(level: Option<LogLevel>, handlers: &[&str]) -> Self {
        Self {
            level,
            handlers: handlers.iter().map(|h| h.to_string()).collect(),
            propagate: true,
        }
    }

    #[must_use]
    pub fn propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }
}

impl LoggingConfig {
    /// Parse and check a TOML table.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_router::config::LoggingConfig;
    ///
    /// let config = LoggingConfig::from_toml_str(r#"
    ///     [handlers.console]
    ///     kind = "console"
    ///
    ///     [loggers.""]
    ///     level = "INFO"
    ///     handlers = ["console"]
    /// "#).expect("valid table");
    /// assert_eq!(config.handlers.len(), 1);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LoggingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading logging config", path.display().to_string(), e)
        })?;
        Self::from_toml_str(&content)
    }

    /// Check everything that can be checked without touching a destination
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(LoggerError::config(
                "version",
                format!("unsupported version {} (expected {})", self.version, CONFIG_VERSION),
            ));
        }

        for (name, formatter) in &self.formatters {
            formatter.compile(name)?;
        }

        for (name, handler) in &self.handlers {
            let component = format!("handlers.{}", name);
            if let Some(ref formatter) = handler.formatter {
                if !self.formatters.contains_key(formatter) {
                    return Err(LoggerError::config(
                        component,
                        format!("unknown formatter '{}'", formatter),
                    ));
                }
            }
            match &handler.sink {
                SinkKind::Console { .. } => {}
                SinkKind::File { path, .. } => {
                    if path.as_os_str().is_empty() {
                        return Err(LoggerError::config(component, "file sink requires a path"));
                    }
                }
                SinkKind::Remote { url, .. } => {
                    if url.trim().is_empty() {
                        return Err(LoggerError::config(component, "remote sink requires a url"));
                    }
                    url::Url::parse(url).map_err(|e| {
                        LoggerError::config(component, format!("invalid url '{}': {}", url, e))
                    })?;
                }
            }
        }

        for (name, logger) in &self.loggers {
            for handler in &logger.handlers {
                if !self.handlers.contains_key(handler) {
                    return Err(LoggerError::config(
                        format!("loggers.{:?}", name),
                        format!("unknown handler '{}'", handler),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Compile formatters, open every sink, and assemble the router
    pub fn build_router(&self) -> Result<LoggingRouter> {
        self.validate()?;

        let mut formatters: HashMap<&str, Formatter> = HashMap::new();
        for (name, config) in &self.formatters {
            formatters.insert(name.as_str(), config.compile(name)?);
        }

        let mut builder = LoggingRouter::builder();
        for (name, handler) in &self.handlers {
            let formatter = handler
                .formatter
                .as_deref()
                .and_then(|f| formatters.get(f));
            let appender = handler.sink.open(formatter)?;
            builder = builder.boxed_sink(name, handler.level, handler.formatter.clone(), appender);
        }
        for formatter in formatters.into_values() {
            builder = builder.formatter(formatter);
        }
        for (name, logger) in &self.loggers {
            let mut spec = LoggerSpec::new()
                .maybe_level(logger.level)
                .propagate(logger.propagate);
            for handler in &logger.handlers {
                spec = spec.handler(handler);
            }
            builder = builder.logger(name, spec);
        }
        builder.build()
    }
}
