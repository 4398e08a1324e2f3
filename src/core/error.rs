//! Error types for the log router

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML configuration could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Severity name that does not map to a level
    #[error("Unknown log level '{value}' for {component}")]
    UnknownLevel { component: String, value: String },

    /// Environment profile name that is not supported
    #[error("Unknown environment profile '{name}' (expected one of: {expected})")]
    UnknownProfile { name: String, expected: String },

    /// Required setting absent from the environment
    #[error("Missing required setting '{key}'")]
    MissingSetting { key: String },

    /// Template that cannot be compiled
    #[error("Formatter error ({formatter}): {message}")]
    FormatterError { formatter: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// Failed to deliver a record to a sink
    #[error("Delivery to sink '{sink}' failed: {message}")]
    DeliveryError { sink: String, message: String },

    /// Remote endpoint error
    #[error("Remote sink error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unknown_level(component: impl Into<String>, value: impl Into<String>) -> Self {
        LoggerError::UnknownLevel {
            component: component.into(),
            value: value.into(),
        }
    }

    pub fn unknown_profile(name: impl Into<String>, expected: &[&str]) -> Self {
        LoggerError::UnknownProfile {
            name: name.into(),
            expected: expected.join(", "),
        }
    }

    pub fn missing_setting(key: impl Into<String>) -> Self {
        LoggerError::MissingSetting { key: key.into() }
    }

    /// Create a formatter error
    pub fn formatter(formatter: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            formatter: formatter.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn delivery(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::DeliveryError {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// True for errors that can only come out of configuration loading
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            LoggerError::ConfigParse(_)
                | LoggerError::InvalidConfiguration { .. }
                | LoggerError::UnknownLevel { .. }
                | LoggerError::UnknownProfile { .. }
                | LoggerError::MissingSetting { .. }
                | LoggerError::FormatterError { .. }
                | LoggerError::FileSinkError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("handlers.file", "missing path");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.is_startup_error());

        let err = LoggerError::delivery("remote", "connection refused");
        assert!(matches!(err, LoggerError::DeliveryError { .. }));
        assert!(!err.is_startup_error());
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::unknown_profile("staging", &["development", "production", "test"]);
        assert_eq!(
            err.to_string(),
            "Unknown environment profile 'staging' (expected one of: development, production, test)"
        );

        let err = LoggerError::file_sink("/var/log/app.log", "Permission denied");
        assert_eq!(
            err.to_string(),
            "File sink error for '/var/log/app.log': Permission denied"
        );

        let err = LoggerError::formatter("verbose", "unknown field 'host'");
        assert_eq!(err.to_string(), "Formatter error (verbose): unknown field 'host'");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
