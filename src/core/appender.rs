//! Appender trait for log output destinations

use super::{error::Result, log_record::LogRecord};

/// The I/O half of a sink: receives an already formatted record.
///
/// `rendered` is the sink formatter's output for `record`; the raw record is
/// passed along for appenders that route on its fields (the console stream
/// picks colors from the level, for instance).
pub trait Appender: Send + Sync {
    fn append(&mut self, record: &LogRecord, rendered: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
