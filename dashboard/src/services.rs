use log::info;
use std::sync::Arc;

use common::traits::SensorPort;
use sensor_flow::adapters::{IioDevice, SimulatedDevice};
use sensor_flow::SensorSuite;

use crate::config::{DashboardConfig, DeviceConfig};
use crate::errors::DashboardError;
use crate::home::{HomeModel, HomeSnapshot, Pipeline};
use crate::presenter::{LogPresenter, Presenter};
use crate::screen::HomeScreen;
use crate::shutdown::shutdown_signal;

/// Runs the dashboard on the device named by `config`, logging every frame, until the
/// configured run time elapses or Ctrl+C is pressed.
pub async fn run_service(config: &DashboardConfig) -> Result<HomeSnapshot, DashboardError> {
    let presenter = Arc::new(LogPresenter);
    match &config.device {
        DeviceConfig::Simulated {
            noise_stdev,
            present,
        } => {
            let device = Arc::new(SimulatedDevice::new(present, *noise_stdev)?);
            run_with_port(device, config, presenter).await
        }
        DeviceConfig::Iio { root } => {
            let device = Arc::new(IioDevice::with_root(root)?);
            run_with_port(device, config, presenter).await
        }
    }
}

/// Shows the home screen over `port` until shutdown and returns the last readings.
pub async fn run_with_port<P, R>(
    port: Arc<P>,
    config: &DashboardConfig,
    presenter: Arc<R>,
) -> Result<HomeSnapshot, DashboardError>
where
    P: SensorPort,
    R: Presenter,
{
    let suite = SensorSuite::with_delay(port, config.sampling_delay);
    info!("Available sensors: {:?}", suite.available());

    let model = Arc::new(HomeModel::new(&suite, Pipeline::from(config)));
    let mut screen = HomeScreen::new(model.clone(), presenter, config.chart_capacity);

    screen.show();
    shutdown_signal(config.run_for_millis).await;
    screen.hide().await;

    Ok(model.snapshot())
}
