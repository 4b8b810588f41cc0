use env_logger::Env;
use log::{error, info};
use std::process::ExitCode;

use dashboard::{services, DashboardConfig};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1);
    let config = match DashboardConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match services::run_service(&config).await {
        Ok(snapshot) => {
            info!("Last readings: {:?}", snapshot);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
