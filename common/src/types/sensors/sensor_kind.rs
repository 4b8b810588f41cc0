use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical measurement read from a built-in device sensor.
///
/// Kinds carry data only: the capability feature the device must report, the
/// platform sensor-type identifier, the number of components and a display label.
///
/// # Examples
///
/// ```
/// use common::types::sensors::{Dimension, SensorKind};
///
/// let kind = SensorKind::try_from("gyro").unwrap();
/// assert_eq!(kind, SensorKind::Gyroscope);
/// assert_eq!(kind.sensor_type(), 4);
/// assert_eq!(kind.dimension(), Dimension::Vector);
///
/// let kind = SensorKind::from_feature("android.hardware.sensor.barometer").unwrap();
/// assert_eq!(kind, SensorKind::Pressure);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Light,
    Proximity,
    Accelerometer,
    Gyroscope,
    Pressure,
    Magnetometer,
    AmbientTemperature,
    Humidity,
}

/// Shape of the values a sensor reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    Scalar,
    Vector,
}

pub const TYPE_ACCELEROMETER: i32 = 1;
pub const TYPE_MAGNETIC_FIELD: i32 = 2;
pub const TYPE_GYROSCOPE: i32 = 4;
pub const TYPE_LIGHT: i32 = 5;
pub const TYPE_PRESSURE: i32 = 6;
pub const TYPE_PROXIMITY: i32 = 8;
pub const TYPE_RELATIVE_HUMIDITY: i32 = 12;
pub const TYPE_AMBIENT_TEMPERATURE: i32 = 13;

pub const FEATURE_SENSOR_LIGHT: &str = "android.hardware.sensor.light";
pub const FEATURE_SENSOR_PROXIMITY: &str = "android.hardware.sensor.proximity";
pub const FEATURE_SENSOR_ACCELEROMETER: &str = "android.hardware.sensor.accelerometer";
pub const FEATURE_SENSOR_GYROSCOPE: &str = "android.hardware.sensor.gyroscope";
pub const FEATURE_SENSOR_BAROMETER: &str = "android.hardware.sensor.barometer";
pub const FEATURE_SENSOR_COMPASS: &str = "android.hardware.sensor.compass";
pub const FEATURE_SENSOR_AMBIENT_TEMPERATURE: &str = "android.hardware.sensor.ambient_temperature";
pub const FEATURE_SENSOR_RELATIVE_HUMIDITY: &str = "android.hardware.sensor.relative_humidity";

impl SensorKind {
    /// Every kind, in the order the home screen lists them.
    pub const ALL: [SensorKind; 8] = [
        SensorKind::Light,
        SensorKind::Proximity,
        SensorKind::Accelerometer,
        SensorKind::Gyroscope,
        SensorKind::Pressure,
        SensorKind::Magnetometer,
        SensorKind::AmbientTemperature,
        SensorKind::Humidity,
    ];

    /// Device capability that must be present for this sensor to exist.
    pub fn feature(&self) -> &'static str {
        match self {
            SensorKind::Light => FEATURE_SENSOR_LIGHT,
            SensorKind::Proximity => FEATURE_SENSOR_PROXIMITY,
            SensorKind::Accelerometer => FEATURE_SENSOR_ACCELEROMETER,
            SensorKind::Gyroscope => FEATURE_SENSOR_GYROSCOPE,
            SensorKind::Pressure => FEATURE_SENSOR_BAROMETER,
            SensorKind::Magnetometer => FEATURE_SENSOR_COMPASS,
            SensorKind::AmbientTemperature => FEATURE_SENSOR_AMBIENT_TEMPERATURE,
            SensorKind::Humidity => FEATURE_SENSOR_RELATIVE_HUMIDITY,
        }
    }

    /// Platform sensor-type identifier.
    pub fn sensor_type(&self) -> i32 {
        match self {
            SensorKind::Light => TYPE_LIGHT,
            SensorKind::Proximity => TYPE_PROXIMITY,
            SensorKind::Accelerometer => TYPE_ACCELEROMETER,
            SensorKind::Gyroscope => TYPE_GYROSCOPE,
            SensorKind::Pressure => TYPE_PRESSURE,
            SensorKind::Magnetometer => TYPE_MAGNETIC_FIELD,
            SensorKind::AmbientTemperature => TYPE_AMBIENT_TEMPERATURE,
            SensorKind::Humidity => TYPE_RELATIVE_HUMIDITY,
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            SensorKind::Accelerometer | SensorKind::Gyroscope | SensorKind::Magnetometer => {
                Dimension::Vector
            }
            _ => Dimension::Scalar,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Light => "Light Sensor",
            SensorKind::Proximity => "Proximity Sensor",
            SensorKind::Accelerometer => "Accelerometer Sensor",
            SensorKind::Gyroscope => "Gyroscope Sensor",
            SensorKind::Pressure => "Pressure Sensor",
            SensorKind::Magnetometer => "Magnetometer Sensor",
            SensorKind::AmbientTemperature => "Ambient Temperature Sensor",
            SensorKind::Humidity => "Humidity Sensor",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Light => "lx",
            SensorKind::Proximity => "cm",
            SensorKind::Accelerometer => "m/s^2",
            SensorKind::Gyroscope => "rad/s",
            SensorKind::Pressure => "hPa",
            SensorKind::Magnetometer => "uT",
            SensorKind::AmbientTemperature => "°C",
            SensorKind::Humidity => "%",
        }
    }

    pub fn from_feature(feature: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.feature() == feature)
    }

    pub fn from_sensor_type(sensor_type: i32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.sensor_type() == sensor_type)
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&SensorKind> for usize {
    fn from(value: &SensorKind) -> Self {
        *value as usize
    }
}

impl From<SensorKind> for usize {
    fn from(value: SensorKind) -> Self {
        usize::from(&value)
    }
}

impl TryFrom<&str> for SensorKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let name = value.trim().to_lowercase();
        if name.is_empty() {
            return Err("Invalid format: empty sensor name".to_string());
        }
        // order matters: "proximity" must not be caught by "pr" of pressure
        if name.starts_with("lig") || name.starts_with("lux") {
            Ok(Self::Light)
        } else if name.starts_with("prox") {
            Ok(Self::Proximity)
        } else if name.starts_with("acc") {
            Ok(Self::Accelerometer)
        } else if name.starts_with("gyr") {
            Ok(Self::Gyroscope)
        } else if name.starts_with("pres") || name.starts_with("baro") {
            Ok(Self::Pressure)
        } else if name.starts_with("mag") || name.starts_with("comp") {
            Ok(Self::Magnetometer)
        } else if name.contains("temp") {
            Ok(Self::AmbientTemperature)
        } else if name.contains("humid") {
            Ok(Self::Humidity)
        } else {
            Err(format!("Unknown sensor kind: {value}"))
        }
    }
}

impl TryFrom<String> for SensorKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SensorKind::try_from(value.as_str())
    }
}
