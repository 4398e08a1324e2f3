//! Call-site logger handle

use super::{
    log_level::LogLevel,
    router::{CallSite, LoggingRouter},
};
use std::fmt;
use std::sync::Arc;

/// Named entry point into a [`LoggingRouter`]
///
/// Cheap to clone; all configuration lives in the router. Messages are taken
/// as `impl Display` so `format_args!` (or the crate's macros) defer the
/// interpolation until the level gate has passed.
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use std::sync::Arc;
///
/// let router = Arc::new(LoggingRouter::builder().build()?);
/// let logger = router.get_logger("logging_test.views");
///
/// logger.info("Testing the Logger!!");
/// logger.error(format_args!("User with ID {} does not exist", 1));
/// # Ok::<(), LoggerError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    router: Arc<LoggingRouter>,
    name: String,
}

impl Logger {
    pub fn new(router: Arc<LoggingRouter>, name: impl Into<String>) -> Self {
        Self {
            router,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn router(&self) -> &Arc<LoggingRouter> {
        &self.router
    }

    /// Logger for `self.name + "." + suffix`
    #[must_use]
    pub fn child(&self, suffix: &str) -> Logger {
        let name = if self.name.is_empty() {
            suffix.to_string()
        } else {
            format!("{}.{}", self.name, suffix)
        };
        Logger::new(Arc::clone(&self.router), name)
    }

    #[inline]
    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        self.router.is_enabled_for(&self.name, level)
    }

    pub fn effective_level(&self) -> LogLevel {
        self.router.effective_level(&self.name)
    }

    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        self.router.emit(&self.name, level, message);
    }

    /// Used by the logging macros to attach module, file and line
    #[doc(hidden)]
    pub fn log_at(&self, level: LogLevel, message: impl fmt::Display, call_site: CallSite) {
        self.router.emit_at(&self.name, level, message, call_site);
    }

    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl fmt::Display) {
        self.log(LogLevel::Critical, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("effective_level", &self.effective_level())
            .finish()
    }
}
