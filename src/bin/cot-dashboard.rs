//! COT Dashboard Server Binary
//!
//! Run with: `cargo run --bin cot-dashboard`

use cot_dashboard::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Note: Tracing is initialized in run_server()
    // Set RUST_LOG environment variable to control log level:
    //   RUST_LOG=debug cargo run --bin cot-dashboard
    //   RUST_LOG=cot_dashboard::dashboard=debug cargo run --bin cot-dashboard  (cache hits/misses)

    // HOST, PORT, CFTC_BASE_URL, CFTC_TIMEOUT_SECS, COT_CACHE_TTL_SECS
    let config = ServerConfig::from_env();

    println!("🚀 Starting COT Dashboard Server...");
    println!("   Host: {}", config.host);
    println!("   Port: {}", config.port);
    println!("   Provider: {}", config.cftc.base_url);
    println!("   Cache TTL: {}s", config.cache_ttl_seconds);
    println!();
    println!(
        "Dashboard will be available at: http://{}:{}",
        config.host, config.port
    );
    println!();
    println!("Available endpoints:");
    println!("  GET  /                          - Dashboard page (?instrument=gold&weeks=30)");
    println!("  GET  /health                    - Health check");
    println!("  GET  /instruments               - List instruments");
    println!("  GET  /api/cot/:instrument       - Dashboard data (JSON)");
    println!("  GET  /api/cot/:instrument/csv   - CSV download");
    println!();

    run_server(config).await?;

    Ok(())
}
