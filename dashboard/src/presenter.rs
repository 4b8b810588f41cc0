use async_trait::async_trait;
use log::info;

use common::types::SensorKind;

use crate::home::HomeSnapshot;
use crate::screen::Frame;

/// Output of the home screen.
#[async_trait]
pub trait Presenter: Send + Sync + 'static {
    async fn render(&self, frame: &Frame);
}

pub fn format_scalar(value: f32) -> String {
    format!("{value:.2}")
}

/// Components with two decimals, comma separated.
pub fn format_vector(values: &[f32]) -> String {
    values
        .iter()
        .map(|value| format_scalar(*value))
        .collect::<Vec<_>>()
        .join(",")
}

/// (sensor name, formatted value) rows in screen order.
pub fn readings_table(snapshot: &HomeSnapshot) -> Vec<(&'static str, String)> {
    vec![
        (SensorKind::Light.label(), format_scalar(snapshot.light)),
        (SensorKind::Proximity.label(), format_scalar(snapshot.proximity)),
        (
            SensorKind::Accelerometer.label(),
            format_vector(&snapshot.accelerometer),
        ),
        (SensorKind::Gyroscope.label(), format_vector(&snapshot.gyroscope)),
        (SensorKind::Pressure.label(), format_scalar(snapshot.pressure)),
        (
            SensorKind::Magnetometer.label(),
            format_vector(&snapshot.magnetometer),
        ),
        (
            SensorKind::AmbientTemperature.label(),
            format_scalar(snapshot.ambient_temperature),
        ),
        (SensorKind::Humidity.label(), format_scalar(snapshot.humidity)),
    ]
}

/// Writes every frame to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPresenter;

#[async_trait]
impl Presenter for LogPresenter {
    async fn render(&self, frame: &Frame) {
        let table = readings_table(&frame.readings)
            .into_iter()
            .map(|(name, value)| format!("{name:<28}{value}"))
            .collect::<Vec<_>>()
            .join("\n");
        info!(
            "\n{:<28}Sensor Value\n{}\nCompass: {}\nLight chart: {} points, acceleration chart: {} points",
            "Sensor Name",
            table,
            frame.heading,
            frame.light_chart.len(),
            frame.acceleration_chart.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting() {
        assert_eq!(format_scalar(1013.254), "1013.25");
        assert_eq!(format_scalar(0.0), "0.00");
        assert_eq!(format_vector(&[0.0, -0.126, 9.81]), "0.00,-0.13,9.81");
        assert_eq!(format_vector(&[]), "");
    }

    #[test]
    fn test_readings_table_order() {
        let snapshot = HomeSnapshot {
            light: 120.0,
            accelerometer: vec![0.0, 0.0, 9.81],
            gyroscope: vec![0.0; 3],
            magnetometer: vec![22.0, 5.0, -40.0],
            humidity: 45.5,
            ..Default::default()
        };
        let table = readings_table(&snapshot);
        assert_eq!(table.len(), 8);
        assert_eq!(table[0], ("Light Sensor", "120.00".to_string()));
        assert_eq!(table[2], ("Accelerometer Sensor", "0.00,0.00,9.81".to_string()));
        assert_eq!(table[5], ("Magnetometer Sensor", "22.00,5.00,-40.00".to_string()));
        assert_eq!(table[7], ("Humidity Sensor", "45.50".to_string()));
    }
}
