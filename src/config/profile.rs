//! Environment profiles
//!
//! A profile is a complete application + logging configuration. Exactly one
//! is selected at startup from `APP_PROFILE`; an unset or unknown name is an
//! error rather than a silent fallback, so a production process can never
//! pick up development sinks by accident.

use super::environment::Environment;
use super::table::{FormatterConfig, HandlerConfig, LoggerConfig, LoggingConfig, SinkKind};
use crate::appenders::ConsoleStream;
use crate::core::{FieldStyle, LogLevel, LoggerError, LoggingRouter, OutputFormat, Result};
use std::fmt;
use std::str::FromStr;

/// Variable naming the active profile
pub const PROFILE_VAR: &str = "APP_PROFILE";

/// Optional TOML file replacing the profile's built-in logging table
pub const LOG_CONFIG_VAR: &str = "LOG_CONFIG";

/// Root level override, then its older name
pub const LOG_LEVEL_VARS: [&str; 2] = ["LOG_LEVEL", "DJANGO_LOG_LEVEL"];

/// Log file path, then its older name
pub const LOG_FILE_VARS: [&str; 2] = ["LOG_FILE", "DJANGO_LOG_FILE"];

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///db.sqlite3";

const SIMPLE_FORMAT: &str = "{asctime}: {levelname} {message}";
const VERBOSE_FORMAT: &str = "{name} {levelname} {asctime} {module} {process:d} {thread:d} {message}";
const WIRE_FORMAT: &str = "{asctime} {name} {levelname} {module} {process} {thread} {message}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Development,
    Production,
    Test,
}

impl Profile {
    pub const NAMES: [&'static str; 3] = ["development", "production", "test"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
            Profile::Test => "test",
        }
    }

    /// Built-in logging table for this profile
    pub fn logging_table(&self, env: &Environment) -> Result<LoggingConfig> {
        let mut config = LoggingConfig::default();

        match self {
            Profile::Development => {
                let level = env.level(env.first_set(&LOG_LEVEL_VARS), LogLevel::Debug)?;
                add_formatter(&mut config, "simple", FormatterConfig::new(SIMPLE_FORMAT, FieldStyle::Brace));
                add_formatter(&mut config, "verbose", FormatterConfig::new(VERBOSE_FORMAT, FieldStyle::Brace));
                add_handler(
                    &mut config,
                    "file",
                    HandlerConfig::new(SinkKind::file(env.get_or(env.first_set(&LOG_FILE_VARS), "app.log")))
                        .level(level)
                        .formatter("verbose"),
                );
                add_handler(
                    &mut config,
                    "console",
                    HandlerConfig::new(SinkKind::Console {
                        stream: ConsoleStream::Stderr,
                        colors: true,
                    })
                    .level(level)
                    .formatter("simple"),
                );
                config
                    .loggers
                    .insert(String::new(), LoggerConfig::new(Some(level), &["file", "console"]));
            }
            Profile::Test => {
                let level = env.level(env.first_set(&LOG_LEVEL_VARS), LogLevel::Warning)?;
                add_formatter(&mut config, "simple", FormatterConfig::new(SIMPLE_FORMAT, FieldStyle::Brace));
                add_handler(
                    &mut config,
                    "console",
                    HandlerConfig::new(SinkKind::console(ConsoleStream::Stderr))
                        .level(level)
                        .formatter("simple"),
                );
                config
                    .loggers
                    .insert(String::new(), LoggerConfig::new(Some(level), &["console"]));
            }
            Profile::Production => {
                let level = env.level(env.first_set(&LOG_LEVEL_VARS), LogLevel::Info)?;
                add_formatter(&mut config, "verbose", FormatterConfig::new(VERBOSE_FORMAT, FieldStyle::Brace));
                add_handler(
                    &mut config,
                    "file",
                    HandlerConfig::new(SinkKind::file(env.require(env.first_set(&LOG_FILE_VARS))?))
                        .level(level)
                        .formatter("verbose"),
                );
                let mut handlers = vec!["file"];

                if let Some(url) = env.get("LOG_REMOTE_URL") {
                    add_formatter(
                        &mut config,
                        "wire",
                        FormatterConfig::new(WIRE_FORMAT, FieldStyle::Brace).with_output(OutputFormat::Json),
                    );
                    let token = env.get("LOG_REMOTE_TOKEN").map(String::from);
                    add_handler(
                        &mut config,
                        "remote",
                        HandlerConfig::new(SinkKind::remote(url, token))
                            .level(LogLevel::Error)
                            .formatter("wire"),
                    );
                    handlers.push("remote");
                }
                config
                    .loggers
                    .insert(String::new(), LoggerConfig::new(Some(level), &handlers));
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn add_formatter(config: &mut LoggingConfig, name: &str, formatter: FormatterConfig) {
    config.formatters.insert(name.to_string(), formatter);
}

fn add_handler(config: &mut LoggingConfig, name: &str, handler: HandlerConfig) {
    config.handlers.insert(name.to_string(), handler);
}

impl FromStr for Profile {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            _ => Err(LoggerError::unknown_profile(s, &Profile::NAMES)),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a profile decides
#[derive(Clone)]
pub struct Settings {
    pub profile: Profile,
    pub debug: bool,
    pub allowed_hosts: Vec<String>,
    pub database_url: String,
    pub secret_key: String,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Select the profile named by `APP_PROFILE` and load it
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_router::config::{Environment, Profile, Settings};
    ///
    /// let env = Environment::from_pairs([("APP_PROFILE", "test"), ("SECRET_KEY", "k")]);
    /// let settings = Settings::from_environment(&env).expect("valid profile");
    /// assert_eq!(settings.profile, Profile::Test);
    ///
    /// let env = Environment::from_pairs([("APP_PROFILE", "staging"), ("SECRET_KEY", "k")]);
    /// assert!(Settings::from_environment(&env).is_err());
    /// ```
    pub fn from_environment(env: &Environment) -> Result<Self> {
        let profile: Profile = env.require(PROFILE_VAR)?.parse()?;
        Self::for_profile(profile, env)
    }

    pub fn for_profile(profile: Profile, env: &Environment) -> Result<Self> {
        let secret_key = env.require("SECRET_KEY")?.to_string();
        let database_url = env.get_or("DATABASE_URL", DEFAULT_DATABASE_URL).to_string();

        let (debug, allowed_hosts) = match profile {
            Profile::Development | Profile::Test => {
                (env.bool("DEBUG", true)?, vec!["*".to_string()])
            }
            Profile::Production => (false, env.list("ALLOWED_HOSTS", &[])),
        };

        let logging = match env.get(LOG_CONFIG_VAR) {
            Some(path) => LoggingConfig::from_file(path)?,
            None => profile.logging_table(env)?,
        };

        Ok(Self {
            profile,
            debug,
            allowed_hosts,
            database_url,
            secret_key,
            logging,
        })
    }

    pub fn build_router(&self) -> Result<LoggingRouter> {
        self.logging.build_router()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("profile", &self.profile)
            .field("debug", &self.debug)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("database_url", &self.database_url)
            .field("secret_key", &"<redacted>")
            .field("logging", &self.logging)
            .finish()
    }
}
