//! Basic facade usage
//!
//! Demonstrates the process-wide logger, request context, masking and
//! switching engines at runtime.
//!
//! Run with: cargo run --example basic_usage

use logfacade::prelude::*;
use logfacade::{error, info, kv, warn};
use serde_json::json;

fn main() -> Result<()> {
    println!("=== logfacade - Basic Usage Example ===\n");

    println!("1. Default development console logger:");
    let ctx = CallContext::new()
        .with_request_id("")
        .with_user_info(json!({"id": 42, "name": "ana"}))
        .with_source(json!("demo"));
    info!(Some(&ctx), None, None, "service starting");
    warn!(Some(&ctx), None, Some(kv! { "retries" => 3 }), "slow upstream after {} retries", 3);

    println!("\n2. JSON output with masking, event engine:");
    logfacade::set_config(
        Config::builder()
            .app_name("demo")
            .environment("staging")
            .level(LogLevel::Info)
            .use_json(true)
            .with_caller(true)
            .mask_sensitive_data(["password", "card"])
            .build(),
    )?;
    let metadata = kv! {
        "request" => json!({"user": "ana", "password": "hunter2"}),
        "payment" => json!({"card": "4111111111111111", "amount": 30}),
    };
    info!(Some(&ctx), None, Some(metadata), "payment accepted");
    logfacade::facade::debug(Some(&ctx), None, None, "hidden below info");

    println!("\n3. Same call sites, field engine:");
    logfacade::set_config(
        Config::builder()
            .app_name("demo")
            .engine(EngineKind::Field)
            .use_json(true)
            .build(),
    )?;
    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    error!(Some(&ctx), Some(&err), None, "request {} failed", ctx.request_id());

    logfacade::global().flush()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
