// src/main.rs
use dotenv::dotenv;

use confluence_scanner::config::ScannerConfig;
use confluence_scanner::scanner;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ScannerConfig::from_env();
    log::info!(
        "Starting scan pass over {} symbols ({} interval)",
        config.symbols.len(),
        config.interval
    );

    // One pass, then exit. Scheduling is external; individual symbol
    // failures are logged inside the pass and never change the exit status.
    scanner::run_scan(&config).await;
}
