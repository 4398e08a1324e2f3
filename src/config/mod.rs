//! Configuration tables, environment snapshot and profile selection

pub mod environment;
pub mod profile;
pub mod table;

pub use environment::Environment;
pub use profile::{
    Profile, Settings, DEFAULT_DATABASE_URL, LOG_CONFIG_VAR, LOG_FILE_VARS, LOG_LEVEL_VARS,
    PROFILE_VAR,
};
pub use table::{
    FormatterConfig, HandlerConfig, LoggerConfig, LoggingConfig, SinkKind, CONFIG_VERSION,
};
