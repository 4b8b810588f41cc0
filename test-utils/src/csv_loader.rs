use std::error::Error;

use csv::Reader;

use common::constants::N_XYZ_COORDINATES;
use common::types::{Dimension, SensorKind, Values};

/// Loads a recorded reading sequence.
///
/// Each row starts with the sensor kind (`light`, `accelerometer`, ...) followed by the
/// reading components. Scalar sensors leave the remaining columns empty.
pub fn load_readings(file_path: &str) -> Result<Vec<(SensorKind, Values)>, Box<dyn Error>> {
    let mut rdr = Reader::from_path(file_path)?;
    let mut readings = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let mut fields = record.iter();
        let kind_field = fields.next().ok_or("Empty row")?;
        let kind = SensorKind::try_from(kind_field)
            .map_err(|_| format!("Unknown sensor kind {}", kind_field))?;
        let values = fields
            .filter(|field| !field.trim().is_empty())
            .map(|field| field.trim().parse::<f32>())
            .collect::<Result<Values, _>>()?;

        let expected = match kind.dimension() {
            Dimension::Scalar => 1,
            Dimension::Vector => N_XYZ_COORDINATES,
        };
        if values.len() != expected {
            return Err(format!(
                "Expected {} values for {}, got {}",
                expected,
                kind,
                values.len()
            )
            .into());
        }
        readings.push((kind, values));
    }

    Ok(readings)
}
