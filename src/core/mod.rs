//! Core router types and traits

pub mod appender;
pub mod error;
pub mod formatter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod router;
pub mod timestamp;

pub use appender::Appender;
pub use error::{LoggerError, Result};
pub use formatter::{Field, FieldStyle, Formatter, OutputFormat, MISSING_FIELD_PLACEHOLDER};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::Logger;
pub use metrics::RouterMetrics;
pub use router::{
    CallSite, LoggerNode, LoggerSpec, LoggingRouter, RouterBuilder, Sink, DEFAULT_ROOT_LEVEL,
    ROOT_LOGGER,
};
pub use timestamp::TimestampFormat;
