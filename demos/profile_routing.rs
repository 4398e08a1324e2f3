//! Profile selection and hierarchical routing
//!
//! Loads `.env` (if present) plus the process environment, selects the
//! profile named by `APP_PROFILE` and routes a few records through it.
//!
//! Run with: APP_PROFILE=development SECRET_KEY=dev cargo run --example profile_routing

use rust_log_router::config::PROFILE_VAR;
use rust_log_router::prelude::*;
use rust_log_router::{debug, error, info};
use std::collections::HashMap;
use std::sync::Arc;

struct User {
    name: &'static str,
}

fn find_user(users: &HashMap<u32, User>, logger: &Logger, id: u32) -> Option<&'static str> {
    debug!(logger, "looking up user {}", id);
    match users.get(&id) {
        Some(user) => Some(user.name),
        None => {
            error!(logger, "User with ID {} does not exist", id);
            None
        }
    }
}

fn main() -> Result<()> {
    println!("=== Rust Log Router - Profile Routing Example ===\n");

    let mut env = Environment::from_process_with_dotenv(".env")?;
    if env.get(PROFILE_VAR).is_none() {
        println!("{} not set, using 'development' for this example", PROFILE_VAR);
        env = env.with(PROFILE_VAR, "development");
    }
    if env.get("SECRET_KEY").is_none() {
        env = env.with("SECRET_KEY", "example-only");
    }
    if env.get("LOG_FILE").is_none() {
        let path = std::env::temp_dir().join("profile_routing.log");
        env = env.with("LOG_FILE", path.display().to_string());
    }

    let settings = Settings::from_environment(&env)?;
    println!("Active profile: {}", settings.profile);
    println!("Debug: {}", settings.debug);
    println!("Allowed hosts: {:?}\n", settings.allowed_hosts);

    let router = Arc::new(settings.build_router()?);
    println!("Sinks for 'logging_test.views': {:?}\n", router.sinks_for("logging_test.views"));

    let logger = router.get_logger("logging_test.views");
    info!(logger, "Testing the Logger!!");

    let users = HashMap::from([(7, User { name: "ada" })]);
    if let Some(name) = find_user(&users, &logger, 7) {
        info!(logger, "found user {}", name);
    }
    find_user(&users, &logger, 1);

    let db = logger.child("db");
    db.warning(format_args!("slow query took {} ms", 1250));

    router.flush()?;
    println!("\nMetrics: {:?}", router.metrics());
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
