use serde::Serialize;
use std::fmt;

// East and west are mirrored with respect to a geographic compass rose.
const SECTORS: [(f32, f32, &str); 7] = [
    (22.5, 67.5, "NW"),
    (67.5, 112.5, "W"),
    (112.5, 157.5, "SW"),
    (157.5, 202.5, "S"),
    (202.5, 247.5, "SE"),
    (247.5, 292.5, "E"),
    (292.5, 337.5, "NE"),
];

/// Compass heading derived from the magnetometer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Heading {
    /// Azimuth in `[0, 360)` degrees.
    pub degrees: f32,
    pub direction: &'static str,
}

impl Heading {
    /// Heading from the X and Y components of a magnetometer reading. Readings with
    /// fewer than two components point north.
    pub fn from_magnetometer(values: &[f32]) -> Self {
        let (x, y) = match values {
            [x, y, ..] => (*x, *y),
            _ => return Self::north(),
        };
        let azimuth = x.atan2(y).to_degrees();
        let degrees = (azimuth + 360.0) % 360.0;
        Self {
            degrees,
            direction: direction(degrees),
        }
    }

    fn north() -> Self {
        Self {
            degrees: 0.0,
            direction: "N",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}° {}", self.degrees as i32, self.direction)
    }
}

/// Label of the 45 degree sector containing `degrees`. Bounds belong to the first
/// matching sector.
pub fn direction(degrees: f32) -> &'static str {
    SECTORS
        .iter()
        .find(|(from, to, _)| (*from..=*to).contains(&degrees))
        .map_or("N", |(_, _, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_heading(values: &[f32], degrees: f32, label: &str) {
        let heading = Heading::from_magnetometer(values);
        assert!(
            (heading.degrees - degrees).abs() < 1e-3,
            "{} != {}",
            heading.degrees,
            degrees
        );
        assert_eq!(heading.direction, label);
    }

    #[test]
    fn test_cardinal_points() {
        assert_heading(&[0.0, 30.0, -40.0], 0.0, "N");
        assert_heading(&[30.0, 0.0, -40.0], 90.0, "W");
        assert_heading(&[0.0, -30.0, -40.0], 180.0, "S");
        assert_heading(&[-30.0, 0.0, -40.0], 270.0, "E");
    }

    #[test]
    fn test_diagonals() {
        assert_heading(&[10.0, 10.0, 0.0], 45.0, "NW");
        assert_heading(&[10.0, -10.0, 0.0], 135.0, "SW");
        assert_heading(&[-10.0, -10.0, 0.0], 225.0, "SE");
        assert_heading(&[-10.0, 10.0, 0.0], 315.0, "NE");
    }

    #[test]
    fn test_sector_bounds() {
        assert_eq!(direction(22.4), "N");
        assert_eq!(direction(22.5), "NW");
        assert_eq!(direction(67.5), "NW");
        assert_eq!(direction(337.5), "NE");
        assert_eq!(direction(337.6), "N");
    }

    #[test]
    fn test_short_reading_points_north() {
        assert_eq!(Heading::from_magnetometer(&[]), Heading::north());
        assert_eq!(Heading::from_magnetometer(&[5.0]), Heading::north());
    }

    #[test]
    fn test_display() {
        let heading = Heading::from_magnetometer(&[22.0, 5.0, -40.0]);
        assert_eq!(heading.to_string(), "77° W");
    }
}
