//! Integration tests for the logging router
//!
//! These tests verify:
//! - Two-stage filtering (logger level, then sink level)
//! - Level inheritance and handler-chain resolution for unconfigured names
//! - Propagation and its cut-off
//! - Sink isolation when one destination fails
//! - File and remote sinks built from a configuration table
//! - Log injection prevention

use parking_lot::Mutex;
use rust_log_router::appenders::FileAppender;
use rust_log_router::config::{HandlerConfig, LoggerConfig, LoggingConfig, SinkKind};
use rust_log_router::prelude::*;
use rust_log_router::{error, info, DEFAULT_ROOT_LEVEL, MISSING_FIELD_PLACEHOLDER};
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

type Deliveries = Arc<Mutex<Vec<(String, String)>>>;

/// Records `(sink, rendered)` pairs into one shared list so cross-sink
/// ordering is observable
struct Recorder {
    sink: String,
    deliveries: Deliveries,
}

impl Appender for Recorder {
    fn append(&mut self, _record: &LogRecord, rendered: &str) -> Result<()> {
        self.deliveries
            .lock()
            .push((self.sink.clone(), rendered.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.sink
    }
}

struct Failing;

impl Appender for Failing {
    fn append(&mut self, _record: &LogRecord, _rendered: &str) -> Result<()> {
        Err(LoggerError::delivery("broken", "destination unavailable"))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn recorder(sink: &str, deliveries: &Deliveries) -> Recorder {
    Recorder {
        sink: sink.to_string(),
        deliveries: Arc::clone(deliveries),
    }
}

fn message_formatter() -> Formatter {
    Formatter::parse("message", "{levelname} {message}", FieldStyle::Brace)
        .expect("valid template")
}

#[test]
fn test_unconfigured_child_inherits_root() {
    let deliveries = Deliveries::default();
    let router = LoggingRouter::builder()
        .formatter(message_formatter())
        .sink("console", LogLevel::Debug, "message", recorder("console", &deliveries))
        .logger("", LoggerSpec::new().level(LogLevel::Info).handler("console"))
        .build()
        .expect("router builds");
    let router = Arc::new(router);
    let logger = router.get_logger("app.sub");

    logger.debug("below the inherited level");
    assert!(deliveries.lock().is_empty());

    logger.warning("disk almost full");
    assert_eq!(
        *deliveries.lock(),
        [("console".to_string(), "WARNING disk almost full".to_string())]
    );
    assert_eq!(router.effective_level("app.sub"), LogLevel::Info);
    assert_eq!(router.sinks_for("app.sub"), ["console"]);
}

#[test]
fn test_longest_prefix_wins() {
    let deliveries = Deliveries::default();
    let router = LoggingRouter::builder()
        .formatter(message_formatter())
        .sink("root", LogLevel::Debug, "message", recorder("root", &deliveries))
        .sink("app", LogLevel::Debug, "message", recorder("app", &deliveries))
        .sink("db", LogLevel::Debug, "message", recorder("db", &deliveries))
        .logger("", LoggerSpec::new().level(LogLevel::Warning).handler("root"))
        .logger("app", LoggerSpec::new().level(LogLevel::Info).handler("app"))
        .logger("app.db", LoggerSpec::new().level(LogLevel::Debug).handler("db"))
        .build()
        .expect("router builds");

    assert_eq!(router.resolve("app.db.pool.conn").name(), "app.db");
    assert_eq!(router.resolve("app.dbx").name(), "app");
    assert_eq!(router.resolve("other").name(), "");

    assert_eq!(router.effective_level("app.db.pool"), LogLevel::Debug);
    assert_eq!(router.effective_level("app.views"), LogLevel::Info);
    assert_eq!(router.effective_level("other"), LogLevel::Warning);

    assert_eq!(router.sinks_for("app.db.pool"), ["db", "app", "root"]);
    assert_eq!(router.sinks_for("app.views"), ["app", "root"]);
}

#[test]
fn test_level_inherits_from_ancestor_when_unset() {
    let router = LoggingRouter::builder()
        .logger("", LoggerSpec::new().level(LogLevel::Error))
        .logger("app", LoggerSpec::new())
        .build()
        .expect("router builds");

    assert_eq!(router.node("app").and_then(|n| n.level()), None);
    assert_eq!(router.effective_level("app"), LogLevel::Error);
    assert!(!router.is_enabled_for("app.views", LogLevel::Warning));
    assert!(router.is_enabled_for("app.views", LogLevel::Critical));
}

#[test]
fn test_root_defaults_to_warning() {
    let router = LoggingRouter::builder().build().expect("router builds");
    assert_eq!(router.effective_level(""), LogLevel::Warning);
    assert_eq!(router.effective_level("anything.at.all"), DEFAULT_ROOT_LEVEL);
}

#[test]
fn test_propagate_false_stops_ancestor_sinks() {
    let deliveries = Deliveries::default();
    let router = LoggingRouter::builder()
        .formatter(message_formatter())
        .sink("console", LogLevel::Debug, "message", recorder("console", &deliveries))
        .sink("file", LogLevel::Debug, "message", recorder("file", &deliveries))
        .logger("", LoggerSpec::new().level(LogLevel::Info).handler("console"))
        .logger(
            "app.db",
            LoggerSpec::new()
                .level(LogLevel::Warning)
                .handler("file")
                .propagate(false),
        )
        .build()
        .expect("router builds");

    router.emit("app.db.pool", LogLevel::Error, "connection refused");
    router.emit("app.views", LogLevel::Error, "render failed");

    assert_eq!(
        *deliveries.lock(),
        [
            ("file".to_string(), "ERROR connection refused".to_string()),
            ("console".to_string(), "ERROR render failed".to_string()),
        ]
    );
}

#[test]
fn test_sink_levels_apply_after_logger_level() {
    let deliveries = Deliveries::default();
    let router = LoggingRouter::builder()
        .formatter(message_formatter())
        .sink("console", LogLevel::Debug, "message", recorder("console", &deliveries))
        .sink("file", LogLevel::Error, "message", recorder("file", &deliveries))
        .logger(
            "",
            LoggerSpec::new()
                .level(LogLevel::Debug)
                .handler("console")
                .handler("file"),
        )
        .build()
        .expect("router builds");
    let router = Arc::new(router);
    let logger = router.get_logger("logging_test.views");

    logger.info("Testing the Logger!!");
    assert_eq!(
        *deliveries.lock(),
        [("console".to_string(), "INFO Testing the Logger!!".to_string())]
    );

    deliveries.lock().clear();
    error!(logger, "User with ID {} does not exist", 1);
    assert_eq!(
        *deliveries.lock(),
        [
            ("console".to_string(), "ERROR User with ID 1 does not exist".to_string()),
            ("file".to_string(), "ERROR User with ID 1 does not exist".to_string()),
        ]
    );
}

#[test]
fn test_failing_sink_does_not_block_siblings() {
    let deliveries = Deliveries::default();
    let router = LoggingRouter::builder()
        .formatter(message_formatter())
        .sink("broken", LogLevel::Debug, "message", Failing)
        .sink("console", LogLevel::Debug, "message", recorder("console", &deliveries))
        .logger(
            "",
            LoggerSpec::new()
                .level(LogLevel::Debug)
                .handler("broken")
                .handler("console"),
        )
        .build()
        .expect("router builds");

    router.emit("app", LogLevel::Error, "still delivered");

    assert_eq!(
        *deliveries.lock(),
        [("console".to_string(), "ERROR still delivered".to_string())]
    );
    assert_eq!(router.metrics().deliveries(), 1);
    assert_eq!(router.metrics().delivery_failures(), 1);
}

#[cfg(target_os = "linux")]
#[test]
fn test_full_disk_file_sink_does_not_block_console() {
    let deliveries = Deliveries::default();
    let file = FileAppender::new("/dev/full", true).expect("device opens");
    let router = LoggingRouter::builder()
        .formatter(message_formatter())
        .sink("file", LogLevel::Debug, "message", file)
        .sink("console", LogLevel::Debug, "message", recorder("console", &deliveries))
        .logger(
            "",
            LoggerSpec::new()
                .level(LogLevel::Info)
                .handler("file")
                .handler("console"),
        )
        .build()
        .expect("router builds");

    router.emit("app", LogLevel::Warning, "no space left");

    assert_eq!(deliveries.lock().len(), 1);
    assert_eq!(router.metrics().delivery_failures(), 1);
}

#[test]
fn test_missing_module_renders_placeholder() {
    let deliveries = Deliveries::default();
    let router = LoggingRouter::builder()
        .formatter(
            Formatter::parse("verbose", "{name} {module} {message}", FieldStyle::Brace)
                .expect("valid template"),
        )
        .sink("console", LogLevel::Debug, "verbose", recorder("console", &deliveries))
        .logger("", LoggerSpec::new().level(LogLevel::Debug).handler("console"))
        .build()
        .expect("router builds");
    let router = Arc::new(router);
    let logger = router.get_logger("app");

    logger.info("plain call");
    info!(logger, "macro call");

    let lines = deliveries.lock();
    assert_eq!(
        lines[0].1,
        format!("app {} plain call", MISSING_FIELD_PLACEHOLDER)
    );
    assert_eq!(
        lines[1].1,
        format!("app {} macro call", module_path!())
    );
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let mut config = LoggingConfig::default();
    config
        .handlers
        .insert("file".to_string(), HandlerConfig::new(SinkKind::file(&log_file)));
    config
        .loggers
        .insert(String::new(), LoggerConfig::new(Some(LogLevel::Info), &["file"]));
    let router = config.build_router().expect("router builds");

    router.emit(
        "app",
        LogLevel::Info,
        "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation",
    );
    router.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("\\n"));
    assert_eq!(content.lines().count(), 1, "Log should be a single line");
}

#[test]
fn test_file_sink_from_table_appends() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");
    fs::write(&log_file, "earlier line\n").expect("seed file");

    let table = format!(
        r#"
        [formatters.simple]
        format = "{{levelname}}: {{message}}"

        [handlers.file]
        kind = "file"
        path = {:?}
        level = "INFO"
        formatter = "simple"

        [loggers.""]
        level = "DEBUG"
        handlers = ["file"]
        "#,
        log_file.display().to_string()
    );
    let router = LoggingConfig::from_toml_str(&table)
        .and_then(|config| config.build_router())
        .expect("router builds");

    router.emit("app", LogLevel::Debug, "filtered by sink");
    router.emit("app", LogLevel::Info, "kept");
    router.flush().expect("flush");

    assert_eq!(
        fs::read_to_string(&log_file).expect("read log"),
        "earlier line\nINFO: kept\n"
    );
}

#[test]
fn test_unopenable_file_is_startup_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = LoggingConfig::default();
    config.handlers.insert(
        "file".to_string(),
        HandlerConfig::new(SinkKind::file(temp_dir.path().join("missing/dir/app.log"))),
    );

    let err = config.build_router().expect_err("missing directory");
    assert!(err.is_startup_error());
}

#[test]
fn test_remote_sink_posts_json_with_bearer_token() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");

    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream);
        let mut head = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().expect("length");
            }
            head.push(line);
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("read body");
        reader
            .get_mut()
            .write_all(b"HTTP/1.1 202 Accepted\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .expect("respond");
        (head, String::from_utf8(body).expect("utf8 body"))
    });

    let table = format!(
        r#"
        [formatters.wire]
        format = "{{name}} {{levelname}} {{module}} {{message}}"
        output = "json"

        [handlers.remote]
        kind = "remote"
        url = "http://{}/ingest"
        token = "s3cret"
        level = "ERROR"
        formatter = "wire"

        [loggers.""]
        level = "INFO"
        handlers = ["remote"]
        "#,
        addr
    );
    let router = LoggingConfig::from_toml_str(&table)
        .and_then(|config| config.build_router())
        .expect("router builds");

    router.emit("payments", LogLevel::Warning, "below the sink level");
    router.emit("payments", LogLevel::Error, "card declined");

    let (head, body) = server.join().expect("server thread");
    assert!(head[0].starts_with("POST /ingest"));
    assert!(head
        .iter()
        .any(|h| h.to_ascii_lowercase().starts_with("authorization: bearer s3cret")));
    assert!(head
        .iter()
        .any(|h| h.to_ascii_lowercase().starts_with("content-type: application/json")));

    let payload: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(payload["name"], "payments");
    assert_eq!(payload["levelname"], "ERROR");
    assert_eq!(payload["module"], serde_json::Value::Null);
    assert_eq!(payload["message"], "card declined");
    assert_eq!(router.metrics().delivery_failures(), 0);
}

#[test]
fn test_remote_sink_failure_is_isolated() {
    // Bind then drop so the port refuses connections
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };
    let deliveries = Deliveries::default();
    let remote = RemoteAppender::new(
        &format!("http://{}/ingest", addr),
        None,
        std::time::Duration::from_millis(500),
    )
    .expect("valid url");

    let router = LoggingRouter::builder()
        .formatter(message_formatter())
        .sink("remote", LogLevel::Error, "message", remote)
        .sink("console", LogLevel::Debug, "message", recorder("console", &deliveries))
        .logger(
            "",
            LoggerSpec::new()
                .level(LogLevel::Info)
                .handler("remote")
                .handler("console"),
        )
        .build()
        .expect("router builds");

    router.emit("app", LogLevel::Critical, "remote is down");

    assert_eq!(deliveries.lock().len(), 1);
    assert_eq!(router.metrics().delivery_failures(), 1);
}
