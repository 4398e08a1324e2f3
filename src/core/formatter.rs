//! Record formatters
//!
//! A [`Formatter`] is compiled once from a field template and then renders
//! records for one or more sinks. Two template styles are understood:
//!
//! - brace: `{asctime}: {levelname:<8} {process:d} {message}`
//! - percent: `%(name)s: %(asctime)s: %(levelno)s: %(message)s`
//!
//! The same template drives three output kinds:
//! - Text: the template itself, literals included
//! - Json: one object whose keys are the template's fields, in template order
//! - Logfmt: `key=value` pairs for the template's fields, in template order

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendered in place of an optional field the record does not carry
pub const MISSING_FIELD_PLACEHOLDER: &str = "-";

/// Template syntax
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldStyle {
    #[default]
    #[serde(rename = "{", alias = "brace")]
    Brace,
    #[serde(rename = "%", alias = "percent")]
    Percent,
}

/// Output representation produced by a formatter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text (default)
    ///
    /// Example: `2025-01-08 10:30:45,123: ERROR User with ID 1 does not exist`
    #[default]
    Text,

    /// One JSON object per record
    ///
    /// Example: `{"asctime":"2025-01-08 10:30:45,123","levelname":"ERROR","message":"..."}`
    Json,

    /// Logfmt key/value pairs
    ///
    /// Example: `asctime="2025-01-08 10:30:45,123" levelname=ERROR message="..."`
    Logfmt,
}

/// Record attribute a template may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AscTime,
    Name,
    LevelName,
    LevelNo,
    Module,
    Process,
    Thread,
    ThreadName,
    FileName,
    LineNo,
    Message,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::AscTime,
        Field::Name,
        Field::LevelName,
        Field::LevelNo,
        Field::Module,
        Field::Process,
        Field::Thread,
        Field::ThreadName,
        Field::FileName,
        Field::LineNo,
        Field::Message,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::AscTime => "asctime",
            Field::Name => "name",
            Field::LevelName => "levelname",
            Field::LevelNo => "levelno",
            Field::Module => "module",
            Field::Process => "process",
            Field::Thread => "thread",
            Field::ThreadName => "threadName",
            Field::FileName => "filename",
            Field::LineNo => "lineno",
            Field::Message => "message",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            Field::LevelNo | Field::Process | Field::Thread | Field::LineNo
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A resolved field value; `None` from [`Formatter::field_value`] means absent
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Int(i64),
}

impl Value {
    fn into_json(self) -> serde_json::Value {
        match self {
            Value::Str(s) => serde_json::Value::String(s),
            Value::Int(i) => serde_json::Value::from(i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FieldSpec {
    align: Option<Align>,
    fill: Option<char>,
    width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field, FieldSpec),
}

/// Compiled record template
#[derive(Debug, Clone)]
pub struct Formatter {
    name: String,
    segments: Vec<Segment>,
    output: OutputFormat,
    timestamp_format: TimestampFormat,
}

impl Default for Formatter {
    /// Message only, as text
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            segments: vec![Segment::Field(Field::Message, FieldSpec::default())],
            output: OutputFormat::Text,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl Formatter {
    /// Compile a template.
    ///
    /// # Errors
    ///
    /// Unknown field names, unbalanced braces, bad format specs, numeric
    /// conversions on text fields, and templates without any field.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_router::{FieldStyle, Formatter};
    ///
    /// let formatter = Formatter::parse("simple", "{asctime}: {levelname} {message}", FieldStyle::Brace)
    ///     .expect("valid template");
    /// assert_eq!(formatter.fields().count(), 3);
    /// ```
    pub fn parse(name: impl Into<String>, template: &str, style: FieldStyle) -> Result<Self> {
        let name = name.into();
        let segments = match style {
            FieldStyle::Brace => parse_brace(template),
            FieldStyle::Percent => parse_percent(template),
        }
        .map_err(|message| LoggerError::formatter(&name, message))?;

        if !segments.iter().any(|s| matches!(s, Segment::Field(..))) {
            return Err(LoggerError::formatter(
                &name,
                format!("template '{}' references no fields", template),
            ));
        }

        Ok(Self {
            name,
            segments,
            output: OutputFormat::Text,
            timestamp_format: TimestampFormat::default(),
        })
    }

    #[must_use]
    pub fn with_output_format(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
    }

    /// Fields referenced by the template, in template order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(field, _) => Some(*field),
            Segment::Literal(_) => None,
        })
    }

    /// MIME type of [`render`](Self::render)'s output
    pub fn content_type(&self) -> &'static str {
        match self.output {
            OutputFormat::Json => "application/json",
            OutputFormat::Text | OutputFormat::Logfmt => "text/plain; charset=utf-8",
        }
    }

    pub fn render(&self, record: &LogRecord) -> String {
        match self.output {
            OutputFormat::Text => self.render_text(record),
            OutputFormat::Json => self.render_json(record),
            OutputFormat::Logfmt => self.render_logfmt(record),
        }
    }

    fn field_value(&self, field: Field, record: &LogRecord) -> Option<Value> {
        let value = match field {
            Field::AscTime => Value::Str(self.timestamp_format.format(&record.timestamp)),
            Field::Name => Value::Str(display_name(&record.logger_name).to_string()),
            Field::LevelName => Value::Str(record.level.to_str().to_string()),
            Field::LevelNo => Value::Int(i64::from(record.level.number())),
            Field::Module => Value::Str(record.module.clone()?),
            Field::Process => Value::Int(i64::from(record.process_id)),
            Field::Thread => Value::Int(record.thread_id as i64),
            Field::ThreadName => Value::Str(record.thread_name.clone()?),
            Field::FileName => Value::Str(record.file_name()?.to_string()),
            Field::LineNo => Value::Int(i64::from(record.line?)),
            Field::Message => Value::Str(record.message.clone()),
        };
        Some(value)
    }

    fn render_text(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(128);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field, spec) => {
                    let (text, numeric) = match self.field_value(*field, record) {
                        Some(Value::Str(s)) => (s, false),
                        Some(Value::Int(i)) => (i.to_string(), true),
                        None => (MISSING_FIELD_PLACEHOLDER.to_string(), field.is_numeric()),
                    };
                    pad_into(&mut out, &text, spec, numeric);
                }
            }
        }
        out
    }

    fn render_json(&self, record: &LogRecord) -> String {
        let mut json_obj = serde_json::Map::new();
        for field in self.fields() {
            if json_obj.contains_key(field.key()) {
                continue;
            }
            let value = match field {
                Field::AscTime => self.timestamp_format.format_json(&record.timestamp),
                _ => self
                    .field_value(field, record)
                    .map(Value::into_json)
                    .unwrap_or(serde_json::Value::Null),
            };
            json_obj.insert(field.key().to_string(), value);
        }
        serde_json::Value::Object(json_obj).to_string()
    }

    fn render_logfmt(&self, record: &LogRecord) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut seen: Vec<Field> = Vec::new();
        for field in self.fields() {
            if seen.contains(&field) {
                continue;
            }
            seen.push(field);
            let value = match self.field_value(field, record) {
                Some(Value::Int(i)) => i.to_string(),
                // Message is always quoted for safety
                Some(Value::Str(s)) if field == Field::Message => quote_logfmt_value(&s),
                Some(Value::Str(s)) => escape_logfmt_value(&s),
                None => MISSING_FIELD_PLACEHOLDER.to_string(),
            };
            parts.push(format!("{}={}", field.key(), value));
        }
        parts.join(" ")
    }
}

/// The root logger has an empty name but prints as `root`
fn display_name(logger_name: &str) -> &str {
    if logger_name.is_empty() {
        "root"
    } else {
        logger_name
    }
}

fn pad_into(out: &mut String, text: &str, spec: &FieldSpec, numeric: bool) {
    let len = text.chars().count();
    if len >= spec.width {
        out.push_str(text);
        return;
    }
    let fill = spec.fill.unwrap_or(' ');
    let missing = spec.width - len;
    let align = spec
        .align
        .unwrap_or(if numeric { Align::Right } else { Align::Left });
    let (before, after) = match align {
        Align::Left => (0, missing),
        Align::Right => (missing, 0),
        Align::Center => (missing / 2, missing - missing / 2),
    };
    out.extend(std::iter::repeat(fill).take(before));
    out.push_str(text);
    out.extend(std::iter::repeat(fill).take(after));
}

fn resolve_field(key: &str) -> std::result::Result<Field, String> {
    Field::from_key(key).ok_or_else(|| format!("unknown field '{}'", key))
}

fn check_conversion(field: Field, conversion: Option<char>) -> std::result::Result<(), String> {
    match conversion {
        None | Some('s') => Ok(()),
        Some('d') if field.is_numeric() => Ok(()),
        Some('d') => Err(format!("field '{}' is not numeric, cannot use 'd'", field)),
        Some(other) => Err(format!("unsupported conversion '{}' for field '{}'", other, field)),
    }
}

fn push_literal(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn parse_align(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        _ => None,
    }
}

/// `[[fill]align][width][type]`
fn parse_brace_spec(field: Field, spec: &str) -> std::result::Result<FieldSpec, String> {
    let chars: Vec<char> = spec.chars().collect();
    let mut parsed = FieldSpec::default();
    let mut i = 0;

    if chars.len() >= 2 && parse_align(chars[1]).is_some() {
        parsed.fill = Some(chars[0]);
        parsed.align = parse_align(chars[1]);
        i = 2;
    } else if let Some(align) = chars.first().copied().and_then(parse_align) {
        parsed.align = Some(align);
        i = 1;
    }

    let digits: String = chars[i..].iter().take_while(|c| c.is_ascii_digit()).collect();
    i += digits.len();
    if !digits.is_empty() {
        parsed.width = digits
            .parse()
            .map_err(|_| format!("invalid width in '{{{}:{}}}'", field, spec))?;
    }

    let rest: String = chars[i..].iter().collect();
    let conversion = match rest.len() {
        0 => None,
        1 => rest.chars().next(),
        _ => return Err(format!("invalid format spec '{}' for field '{}'", spec, field)),
    };
    check_conversion(field, conversion)?;
    Ok(parsed)
}

fn parse_brace(template: &str) -> std::result::Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err("single '}' encountered in template".to_string()),
            '{' => {
                let mut body = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => return Err("nested '{' in field".to_string()),
                        Some(ch) => body.push(ch),
                        None => return Err("unterminated '{' in template".to_string()),
                    }
                }
                let (key, spec) = body.split_once(':').unwrap_or((body.as_str(), ""));
                let field = resolve_field(key.trim())?;
                let spec = parse_brace_spec(field, spec)?;
                push_literal(&mut segments, &mut literal);
                segments.push(Segment::Field(field, spec));
            }
            _ => literal.push(c),
        }
    }
    push_literal(&mut segments, &mut literal);
    Ok(segments)
}

/// `%(key)[-][width]conversion`
fn parse_percent(template: &str) -> std::result::Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => literal.push('%'),
            Some('(') => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some(')') => break,
                        Some(ch) => key.push(ch),
                        None => return Err("unterminated '%(' in template".to_string()),
                    }
                }
                let field = resolve_field(&key)?;

                let mut spec = FieldSpec {
                    align: Some(Align::Right),
                    ..FieldSpec::default()
                };
                if chars.peek() == Some(&'-') {
                    chars.next();
                    spec.align = Some(Align::Left);
                }
                let mut width = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    width.push(d);
                    chars.next();
                }
                if !width.is_empty() {
                    spec.width = width
                        .parse()
                        .map_err(|_| format!("invalid width for field '{}'", field))?;
                }
                let conversion = chars
                    .next()
                    .ok_or_else(|| format!("missing conversion after '%({})'", key))?;
                check_conversion(field, Some(conversion))?;

                push_literal(&mut segments, &mut literal);
                segments.push(Segment::Field(field, spec));
            }
            Some(other) => return Err(format!("expected '(' after '%', found '{}'", other)),
            None => return Err("template ends with a lone '%'".to_string()),
        }
    }
    push_literal(&mut segments, &mut literal);
    Ok(segments)
}

/// Escape a logfmt value (quote if contains spaces)
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

/// Quote a logfmt value
fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
