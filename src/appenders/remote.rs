//! Remote appender for centralized logging
//!
//! Posts each formatted record to an HTTP(S) ingestion endpoint. The send
//! is bounded by a timeout; expiry, transport errors and non-2xx answers are
//! delivery failures for that one record. There is no retry.

use crate::core::{Appender, LogRecord, LoggerError, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// Default bound on a single send
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP appender that sends logs to a remote ingestion endpoint
///
/// # Example
///
/// ```no_run
/// use rust_log_router::appenders::RemoteAppender;
/// use std::time::Duration;
///
/// let appender = RemoteAppender::new("https://logs.example.com/ingest", Some("s3cr3t".into()), Duration::from_secs(2))
///     .expect("valid endpoint");
/// ```
pub struct RemoteAppender {
    client: Client,
    endpoint: Url,
    token: Option<String>,
    content_type: &'static str,
}

impl RemoteAppender {
    /// # Errors
    ///
    /// The endpoint must be an absolute `http` or `https` URL.
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            LoggerError::config("remote sink", format!("invalid endpoint '{}': {}", endpoint, e))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(LoggerError::config(
                "remote sink",
                format!("endpoint '{}' must use http or https", endpoint),
            ));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            token: token.filter(|t| !t.is_empty()),
            content_type: "text/plain; charset=utf-8",
        })
    }

    /// Set the `Content-Type` sent with each record, normally taken from the
    /// sink's formatter
    #[must_use]
    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Appender for RemoteAppender {
    fn append(&mut self, _record: &LogRecord, rendered: &str) -> Result<()> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, self.content_type)
            .body(rendered.to_string());
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoggerError::delivery(
                self.name(),
                format!("{} answered {}", self.endpoint, status),
            ));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "remote"
    }
}
