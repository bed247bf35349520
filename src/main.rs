extern crate pretty_env_logger;
#[macro_use] extern crate log;

use log::LevelFilter;
use tile_backup::{exit_code, run_backup, BackupConfig, ReqwestTransport, EXIT_DELAY};

#[tokio::main]
async fn main() {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    // A missing .env is fine; the webhook may come from the real environment
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env loaded: {}", e);
    }

    let config = BackupConfig::from_env();
    let transport = ReqwestTransport::new();

    let result = run_backup(&transport, &config).await;
    let code = exit_code(&result);

    tokio::time::sleep(EXIT_DELAY).await;
    std::process::exit(code);
}
