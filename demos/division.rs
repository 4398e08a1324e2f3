//! Error logging from a fallible computation
//!
//! A division that can fail returns a `Result`; the caller logs the failure
//! at ERROR and carries on.
//!
//! Run with: cargo run --example division

use rust_log_router::prelude::*;
use rust_log_router::{error, info};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
enum DivisionError {
    #[error("cannot divide {dividend} by zero")]
    ByZero { dividend: i64 },

    #[error("{dividend} / {divisor} does not fit in an i64")]
    Overflow { dividend: i64, divisor: i64 },
}

fn divide(dividend: i64, divisor: i64) -> std::result::Result<i64, DivisionError> {
    if divisor == 0 {
        return Err(DivisionError::ByZero { dividend });
    }
    dividend
        .checked_div(divisor)
        .ok_or(DivisionError::Overflow { dividend, divisor })
}

fn main() -> Result<()> {
    println!("=== Rust Log Router - Division Example ===\n");

    let router = LoggingRouter::builder()
        .formatter(Formatter::parse(
            "simple",
            "{asctime}: {levelname} {message}",
            FieldStyle::Brace,
        )?)
        .sink(
            "console",
            LogLevel::Debug,
            "simple",
            ConsoleAppender::new(ConsoleStream::Stdout),
        )
        .logger("", LoggerSpec::new().level(LogLevel::Info).handler("console"))
        .build()?;
    let router = Arc::new(router);
    let logger = router.get_logger("division");

    for (dividend, divisor) in [(10, 2), (7, 0), (i64::MIN, -1), (9, 3)] {
        match divide(dividend, divisor) {
            Ok(quotient) => info!(logger, "{} / {} = {}", dividend, divisor, quotient),
            Err(e) => error!(logger, "Division failed: {}", e),
        }
    }

    router.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
