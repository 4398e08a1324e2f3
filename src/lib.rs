//! # Rust Log Router
//!
//! Profile-driven logging router: one configuration per deployment
//! environment, a dotted logger hierarchy, and console, file and remote
//! sinks with template formatters.
//!
//! ## Features
//!
//! - **Profiles**: `development`, `production` and `test`, selected by `APP_PROFILE`
//! - **Hierarchical Loggers**: longest-prefix resolution, level inheritance, propagation
//! - **Two-Stage Filtering**: logger level first, then each sink's own level
//! - **Sink Isolation**: a failing sink never stops delivery to the others
//! - **Lazy Messages**: suppressed calls never interpolate their arguments
//!
//! ## Example
//!
//! ```
//! use rust_log_router::prelude::*;
//! use rust_log_router::{error, info};
//! use std::sync::Arc;
//!
//! let router = LoggingRouter::builder()
//!     .formatter(Formatter::parse("simple", "{asctime}: {levelname} {message}", FieldStyle::Brace)?)
//!     .sink("console", LogLevel::Debug, "simple", ConsoleAppender::new(ConsoleStream::Stderr))
//!     .logger("", LoggerSpec::new().level(LogLevel::Info).handler("console"))
//!     .build()?;
//! let router = Arc::new(router);
//!
//! let logger = router.get_logger("billing.invoices");
//! info!(logger, "issued {} invoices", 3);
//! error!(logger, "User with ID {} does not exist", 1);
//! # Ok::<(), LoggerError>(())
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, ConsoleStream, FileAppender, RemoteAppender};
    pub use crate::config::{Environment, LoggingConfig, Profile, Settings};
    pub use crate::core::{
        Appender, FieldStyle, Formatter, LogLevel, LogRecord, Logger, LoggerError, LoggerSpec,
        LoggingRouter, OutputFormat, Result, RouterBuilder, TimestampFormat,
    };
}

pub use appenders::{ConsoleAppender, ConsoleStream, FileAppender, RemoteAppender};
pub use config::{Environment, LoggingConfig, Profile, Settings};
pub use core::{
    Appender, CallSite, Field, FieldStyle, Formatter, LogLevel, LogRecord, Logger, LoggerError,
    LoggerNode, LoggerSpec, LoggingRouter, OutputFormat, Result, RouterBuilder, RouterMetrics,
    Sink, TimestampFormat, DEFAULT_ROOT_LEVEL, MISSING_FIELD_PLACEHOLDER, ROOT_LOGGER,
};
