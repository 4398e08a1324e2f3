//! Hierarchical record routing
//!
//! A [`LoggingRouter`] owns the logger tree, the sinks and their formatters.
//! Every logging call goes through [`LoggingRouter::emit`]:
//!
//! 1. the requested name resolves to the longest configured dotted prefix
//!    (the root `""` when nothing matches);
//! 2. the effective logger level gates the call; suppressed calls touch no
//!    sink and never interpolate their message;
//! 3. the record is offered to the sinks of the resolved node, then to each
//!    ancestor's sinks while `propagate` holds, each sink applying its own
//!    level.

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    formatter::Formatter,
    log_level::LogLevel,
    log_record::LogRecord,
    logger::Logger,
    metrics::RouterMetrics,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Level of the root logger when the configuration leaves it unset
pub const DEFAULT_ROOT_LEVEL: LogLevel = LogLevel::Warning;

/// Name of the root logger
pub const ROOT_LOGGER: &str = "";

/// Where a call site sits in the source, filled in by the logging macros
#[derive(Debug, Clone, Copy, Default)]
pub struct CallSite {
    pub module: Option<&'static str>,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

/// A configured destination: level gate, formatter and serialized appender
pub struct Sink {
    name: String,
    level: LogLevel,
    formatter: Arc<Formatter>,
    appender: Mutex<Box<dyn Appender>>,
}

impl Sink {
    pub fn new(
        name: impl Into<String>,
        level: LogLevel,
        formatter: Arc<Formatter>,
        appender: Box<dyn Appender>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            formatter,
            appender: Mutex::new(appender),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    #[inline]
    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Format and write one record.
    ///
    /// The appender mutex serializes writers, so concurrent records never
    /// interleave inside one destination.
    pub fn deliver(&self, record: &LogRecord) -> Result<()> {
        let rendered = self.formatter.render(record);
        self.appender.lock().append(record, &rendered)
    }

    pub fn flush(&self) -> Result<()> {
        self.appender.lock().flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("formatter", &self.formatter.name())
            .field("appender", &self.appender.lock().name())
            .finish()
    }
}

/// One configured point of the logger namespace
#[derive(Debug)]
pub struct LoggerNode {
    name: String,
    level: Option<LogLevel>,
    sinks: Vec<Arc<Sink>>,
    propagate: bool,
}

impl LoggerNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Option<LogLevel> {
        self.level
    }

    pub fn propagate(&self) -> bool {
        self.propagate
    }

    pub fn sinks(&self) -> &[Arc<Sink>] {
        &self.sinks
    }
}

/// Drop the last dotted segment; `None` once at the root
fn parent_name(name: &str) -> Option<&str> {
    if name.is_empty() {
        None
    } else {
        Some(name.rsplit_once('.').map_or(ROOT_LOGGER, |(parent, _)| parent))
    }
}

pub struct LoggingRouter {
    nodes: HashMap<String, LoggerNode>,
    sinks: Vec<Arc<Sink>>,
    metrics: RouterMetrics,
}

impl LoggingRouter {
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Hand out a logger for `name`; unconfigured names are fine and inherit
    /// from their nearest configured ancestor.
    pub fn get_logger(self: &Arc<Self>, name: impl Into<String>) -> Logger {
        Logger::new(Arc::clone(self), name.into())
    }

    /// Nearest configured node: exact name, then each dotted prefix, then root
    pub fn resolve(&self, name: &str) -> &LoggerNode {
        let mut current = Some(name);
        while let Some(candidate) = current {
            if let Some(node) = self.nodes.get(candidate) {
                return node;
            }
            current = parent_name(candidate);
        }
        // The builder always inserts a root node
        &self.nodes[ROOT_LOGGER]
    }

    fn parent_node(&self, node: &LoggerNode) -> Option<&LoggerNode> {
        parent_name(&node.name).map(|parent| self.resolve(parent))
    }

    /// Level of the nearest node, walking up from `name`, that sets one
    pub fn effective_level(&self, name: &str) -> LogLevel {
        let mut node = Some(self.resolve(name));
        while let Some(current) = node {
            if let Some(level) = current.level {
                return level;
            }
            node = self.parent_node(current);
        }
        DEFAULT_ROOT_LEVEL
    }

    #[inline]
    pub fn is_enabled_for(&self, name: &str, level: LogLevel) -> bool {
        level >= self.effective_level(name)
    }

    /// Nodes a record from `name` visits, child to root, honoring `propagate`
    fn propagation_chain(&self, name: &str) -> Vec<&LoggerNode> {
        let mut chain = Vec::new();
        let mut node = Some(self.resolve(name));
        while let Some(current) = node {
            chain.push(current);
            if !current.propagate {
                break;
            }
            node = self.parent_node(current);
        }
        chain
    }

    /// Sink names a record from `name` is offered to, in delivery order
    ///
    /// Sink levels are not applied; this is the handler-visibility chain.
    pub fn sinks_for(&self, name: &str) -> Vec<&str> {
        self.propagation_chain(name)
            .into_iter()
            .flat_map(|node| node.sinks.iter().map(|sink| sink.name()))
            .collect()
    }

    /// Route one logging call.
    ///
    /// Never fails: interpolation and delivery problems are reported on
    /// stderr and counted in [`metrics`](Self::metrics).
    pub fn emit(&self, logger_name: &str, level: LogLevel, message: impl fmt::Display) {
        self.emit_at(logger_name, level, message, CallSite::default());
    }

    pub fn emit_at(
        &self,
        logger_name: &str,
        level: LogLevel,
        message: impl fmt::Display,
        call_site: CallSite,
    ) {
        if !self.is_enabled_for(logger_name, level) {
            self.metrics.record_suppressed();
            return;
        }
        self.metrics.record_emitted();

        let mut text = String::new();
        if write!(text, "{}", message).is_err() {
            eprintln!(
                "[LOGGER ERROR] Failed to format message for logger '{}' at {}",
                logger_name, level
            );
            text = format!("<unformattable message> {}", text);
        }

        let mut record = LogRecord::new(logger_name, level, text);
        if let Some(module) = call_site.module {
            record = record.with_module(module);
        }
        if let (Some(file), Some(line)) = (call_site.file, call_site.line) {
            record = record.with_location(file, line);
        }

        self.dispatch(&record);
    }

    /// Deliver an accepted record to every qualifying sink on its chain
    ///
    /// **Per-sink isolation**: each delivery is wrapped in `catch_unwind`, so
    /// one failing or panicking sink never keeps the record from the others.
    fn dispatch(&self, record: &LogRecord) {
        for node in self.propagation_chain(&record.logger_name) {
            for sink in node.sinks.iter().filter(|sink| sink.accepts(record.level)) {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    sink.deliver(record)
                }));

                match result {
                    Ok(Ok(())) => {
                        self.metrics.record_delivered();
                    }
                    Ok(Err(e)) => {
                        eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
                        self.metrics.record_delivery_failure();
                    }
                    Err(panic_info) => {
                        let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                            s.to_string()
                        } else if let Some(s) = panic_info.downcast_ref::<String>() {
                            s.clone()
                        } else {
                            "Unknown panic".to_string()
                        };
                        eprintln!(
                            "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                             Other sinks continue to function.",
                            sink.name(),
                            panic_msg
                        );
                        self.metrics.record_delivery_failure();
                    }
                }
            }
        }
    }

    /// Flush every sink, reporting the first failure after trying them all
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn node(&self, name: &str) -> Option<&LoggerNode> {
        self.nodes.get(name)
    }

    pub fn sink(&self, name: &str) -> Option<&Arc<Sink>> {
        self.sinks.iter().find(|sink| sink.name() == name)
    }

    pub fn metrics(&self) -> &RouterMetrics {
        &self.metrics
    }
}

impl fmt::Debug for LoggingRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingRouter")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("sinks", &self.sinks)
            .finish()
    }
}

impl Drop for LoggingRouter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Per-logger settings for [`RouterBuilder::logger`]
#[derive(Debug, Clone)]
pub struct LoggerSpec {
    level: Option<LogLevel>,
    handlers: Vec<String>,
    propagate: bool,
}

impl LoggerSpec {
    pub fn new() -> Self {
        Self {
            level: None,
            handlers: Vec::new(),
            propagate: true,
        }
    }

    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn maybe_level(mut self, level: Option<LogLevel>) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn handler(mut self, sink: impl Into<String>) -> Self {
        self.handlers.push(sink.into());
        self
    }

    #[must_use]
    pub fn propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }
}

impl Default for LoggerSpec {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a [`LoggingRouter`] with a fluent API
///
/// # Example
/// ```
/// use rust_log_router::prelude::*;
///
/// let router = LoggingRouter::builder()
///     .formatter(Formatter::parse("simple", "{levelname} {message}", FieldStyle::Brace)?)
///     .sink("console", LogLevel::Debug, "simple", ConsoleAppender::new(ConsoleStream::Stdout))
///     .logger("", LoggerSpec::new().level(LogLevel::Info).handler("console"))
///     .build()?;
///
/// assert_eq!(router.sinks_for("app.views"), ["console"]);
/// # Ok::<(), LoggerError>(())
/// ```
pub struct RouterBuilder {
    formatters: HashMap<String, Arc<Formatter>>,
    sinks: Vec<(String, LogLevel, Option<String>, Box<dyn Appender>)>,
    loggers: Vec<(String, LoggerSpec)>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            formatters: HashMap::new(),
            sinks: Vec::new(),
            loggers: Vec::new(),
        }
    }

    /// Register a formatter under its own name
    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatters
            .insert(formatter.name().to_string(), Arc::new(formatter));
        self
    }

    /// Add a sink using a registered formatter
    #[must_use = "builder methods return a new value"]
    pub fn sink<A: Appender + 'static>(
        self,
        name: impl Into<String>,
        level: LogLevel,
        formatter: impl Into<String>,
        appender: A,
    ) -> Self {
        self.boxed_sink(name, level, Some(formatter.into()), Box::new(appender))
    }

    /// Add a sink; `None` selects the message-only default formatter
    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(
        mut self,
        name: impl Into<String>,
        level: LogLevel,
        formatter: Option<String>,
        appender: Box<dyn Appender>,
    ) -> Self {
        self.sinks.push((name.into(), level, formatter, appender));
        self
    }

    /// Configure a logger; `""` is the root
    #[must_use = "builder methods return a new value"]
    pub fn logger(mut self, name: impl Into<String>, spec: LoggerSpec) -> Self {
        self.loggers.push((name.into(), spec));
        self
    }

    /// Validate references and assemble the router.
    ///
    /// # Errors
    ///
    /// Duplicate sink or logger names, sinks naming an unknown formatter, and
    /// loggers naming an unknown sink.
    pub fn build(self) -> Result<LoggingRouter> {
        let default_formatter = Arc::new(Formatter::default());
        let mut sinks: Vec<Arc<Sink>> = Vec::with_capacity(self.sinks.len());

        for (name, level, formatter_name, appender) in self.sinks {
            if sinks.iter().any(|sink| sink.name() == name) {
                return Err(LoggerError::config(
                    format!("handlers.{}", name),
                    "handler defined twice",
                ));
            }
            let formatter = match formatter_name {
                Some(ref f) => self.formatters.get(f).cloned().ok_or_else(|| {
                    LoggerError::config(
                        format!("handlers.{}", name),
                        format!("unknown formatter '{}'", f),
                    )
                })?,
                None => Arc::clone(&default_formatter),
            };
            sinks.push(Arc::new(Sink::new(name, level, formatter, appender)));
        }

        let mut nodes: HashMap<String, LoggerNode> = HashMap::new();
        for (name, spec) in self.loggers {
            if nodes.contains_key(&name) {
                return Err(LoggerError::config(
                    format!("loggers.{:?}", name),
                    "logger defined twice",
                ));
            }
            let mut node_sinks = Vec::with_capacity(spec.handlers.len());
            for handler in &spec.handlers {
                let sink = sinks.iter().find(|sink| sink.name() == handler).ok_or_else(|| {
                    LoggerError::config(
                        format!("loggers.{:?}", name),
                        format!("unknown handler '{}'", handler),
                    )
                })?;
                if !node_sinks.iter().any(|s: &Arc<Sink>| Arc::ptr_eq(s, sink)) {
                    node_sinks.push(Arc::clone(sink));
                }
            }
            nodes.insert(
                name.clone(),
                LoggerNode {
                    name,
                    level: spec.level,
                    sinks: node_sinks,
                    propagate: spec.propagate,
                },
            );
        }

        let root = nodes
            .entry(ROOT_LOGGER.to_string())
            .or_insert_with(|| LoggerNode {
                name: ROOT_LOGGER.to_string(),
                level: None,
                sinks: Vec::new(),
                propagate: false,
            });
        root.level.get_or_insert(DEFAULT_ROOT_LEVEL);

        Ok(LoggingRouter {
            nodes,
            sinks,
            metrics: RouterMetrics::new(),
        })
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
