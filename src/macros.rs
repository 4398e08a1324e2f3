//! Logging macros with deferred formatting.
//!
//! The macros build their message with `format_args!`, so arguments are only
//! interpolated once the logger level lets the call through. They also record
//! the calling module, file and line for the `{module}`, `{filename}` and
//! `{lineno}` template fields.
//!
//! # Examples
//!
//! ```
//! use rust_log_router::prelude::*;
//! use rust_log_router::info;
//! use std::sync::Arc;
//!
//! let router = Arc::new(LoggingRouter::builder().build()?);
//! let logger = router.get_logger("server");
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! # Ok::<(), LoggerError>(())
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_log_router::prelude::*;
/// # let router = std::sync::Arc::new(LoggingRouter::builder().build()?);
/// # let logger = router.get_logger("app");
/// use rust_log_router::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at(
            $level,
            format_args!($($arg)+),
            $crate::CallSite {
                module: Some(module_path!()),
                file: Some(file!()),
                line: Some(line!()),
            },
        )
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_log_router::prelude::*;
/// # let router = std::sync::Arc::new(LoggingRouter::builder().build()?);
/// # let logger = router.get_logger("app");
/// use rust_log_router::debug;
/// debug!(logger, "Counter value: {}", 10);
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use rust_log_router::prelude::*;
/// # let router = std::sync::Arc::new(LoggingRouter::builder().build()?);
/// # let logger = router.get_logger("app");
/// use rust_log_router::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
