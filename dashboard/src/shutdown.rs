use log::{error, info};
use std::time::Duration;
use tokio::signal;

/// Resolves after `run_for_millis`, or on Ctrl+C when no run time is configured.
pub async fn shutdown_signal(run_for_millis: Option<u64>) {
    match run_for_millis {
        Some(time_to_live_millis) => {
            tokio::time::sleep(Duration::from_millis(time_to_live_millis)).await;
            info!("Run time of {} ms elapsed. Stopping...", time_to_live_millis);
        }
        None => match signal::ctrl_c().await {
            Ok(()) => info!("Ctrl+C received. Stopping..."),
            Err(e) => error!("Error while waiting for Ctrl+C: {}", e),
        },
    }
}
