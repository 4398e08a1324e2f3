//! Appender implementations

pub mod console;
pub mod file;
pub mod remote;

pub use console::{ConsoleAppender, ConsoleStream};
pub use file::FileAppender;
pub use remote::{RemoteAppender, DEFAULT_REMOTE_TIMEOUT};

// Re-export the trait next to its implementations
pub use crate::core::Appender;
