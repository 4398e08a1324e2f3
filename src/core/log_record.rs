//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<u64>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached numeric thread ID, computing and caching it on first access
///
/// `ThreadId::as_u64` is unstable, so the number is taken from the `Debug`
/// output (`ThreadId(7)`).
fn get_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| {
        *cache.borrow_mut().get_or_insert_with(|| {
            format!("{:?}", std::thread::current().id())
                .chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .unwrap_or(0)
        })
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// One logging call, after it passed the logger level gate.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub logger_name: String,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub process_id: u32,
    pub thread_id: u64,
    pub thread_name: Option<String>,
    pub module: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl LogRecord {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a message can never forge a second record in line-oriented sinks.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(logger_name: impl Into<String>, level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            message: Self::sanitize_message(message.as_ref()),
            timestamp: Utc::now(),
            process_id: std::process::id(),
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            module: None,
            file: None,
            line: None,
        }
    }

    pub fn with_module(mut self, module: &str) -> Self {
        self.module = Some(module.to_string());
        self
    }

    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.file = Some(file.to_string());
        self.line = Some(line);
        self
    }

    /// Last path segment of the source file
    pub fn file_name(&self) -> Option<&str> {
        let file = self.file.as_deref()?;
        file.rsplit(['/', '\\']).next()
    }
}
