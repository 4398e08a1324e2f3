//! File appender implementation
//!
//! Each record is written to the file in a single unbuffered `write_all`.
//! Nothing is held back after a failed write, so a record counted as a
//! delivery failure never reaches the file later.

use crate::core::{Appender, LogRecord, LoggerError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct FileAppender {
    path: PathBuf,
    file: File,
    lock: bool,
}

impl FileAppender {
    /// Open (or create) the log file.
    ///
    /// With `append` false the file is truncated.
    ///
    /// # Errors
    ///
    /// An empty path or a file that cannot be opened; both are startup errors.
    pub fn new(path: impl Into<PathBuf>, append: bool) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(LoggerError::file_sink("", "path must not be empty"));
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)
            .map_err(|e| LoggerError::file_sink(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            path,
            file,
            lock: false,
        })
    }

    /// Hold an exclusive advisory lock on the file while writing each record
    ///
    /// Only needed when several processes share one log file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_log_router::appenders::FileAppender;
    ///
    /// let appender = FileAppender::new("/var/log/app.log", true)
    ///     .unwrap()
    ///     .with_locking(true);
    /// ```
    #[must_use]
    pub fn with_locking(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, rendered: &str) -> std::io::Result<()> {
        let mut line = String::with_capacity(rendered.len() + 1);
        line.push_str(rendered);
        line.push('\n');
        self.file.write_all(line.as_bytes())
    }
}

impl Appender for FileAppender {
    fn append(&mut self, _record: &LogRecord, rendered: &str) -> Result<()> {
        if self.lock {
            self.file.lock_exclusive().map_err(|e| {
                LoggerError::io_operation("locking log file", self.path.display().to_string(), e)
            })?;
        }

        let written = self.write_line(rendered);

        if self.lock {
            let _ = self.file.unlock();
        }

        written.map_err(|e| {
            LoggerError::io_operation("writing log file", self.path.display().to_string(), e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_writes_one_line_per_record() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let mut appender = FileAppender::new(&path, true)?;

        let record = LogRecord::new("app", LogLevel::Info, "first");
        appender.append(&record, "INFO first")?;
        appender.append(&record, "INFO second")?;

        let content = fs::read_to_string(&path)?;
        assert_eq!(content, "INFO first\nINFO second\n");
        Ok(())
    }

    #[test]
    fn test_append_mode_keeps_existing_content() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n")?;

        let record = LogRecord::new("app", LogLevel::Info, "x");
        {
            let mut appender = FileAppender::new(&path, true)?.with_locking(true);
            appender.append(&record, "new")?;
        }
        assert_eq!(fs::read_to_string(&path)?, "old\nnew\n");

        {
            let mut appender = FileAppender::new(&path, false)?;
            appender.append(&record, "fresh")?;
        }
        assert_eq!(fs::read_to_string(&path)?, "fresh\n");
        Ok(())
    }

    #[test]
    fn test_record_is_on_disk_before_flush() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let mut appender = FileAppender::new(&path, true)?;

        let record = LogRecord::new("app", LogLevel::Error, "x");
        appender.append(&record, "ERROR visible")?;

        // Read through a second handle while the appender is still alive
        assert_eq!(fs::read_to_string(&path)?, "ERROR visible\n");
        drop(appender);
        assert_eq!(fs::read_to_string(&path)?, "ERROR visible\n");
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_write_is_not_replayed() {
        let mut appender = FileAppender::new("/dev/full", true).unwrap();
        let record = LogRecord::new("app", LogLevel::Error, "x");

        assert!(appender.append(&record, "ERROR lost").is_err());
        // No bytes from the failed record are left pending
        assert!(appender.flush().is_ok());
        assert!(appender.append(&record, "ERROR also lost").is_err());
        assert!(appender.flush().is_ok());
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let result = FileAppender::new("", true);
        assert!(matches!(result, Err(LoggerError::FileSinkError { .. })));
    }

    #[test]
    fn test_unopenable_path_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("app.log");
        let result = FileAppender::new(path, true);
        assert!(matches!(result, Err(LoggerError::FileSinkError { .. })));
    }
}
