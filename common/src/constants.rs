/// Minimum absolute change a reading needs before it is propagated to subscribers.
pub const NOISE_THRESHOLD: f32 = 0.01;

/// Time the presentation layer keeps a sensor running after its last subscriber left.
pub const STOP_TIMEOUT_MILLIS: u64 = 5000;

/// Points kept by a scrolling chart series.
pub const CHART_CAPACITY: usize = 100;

/// Number of components reported by the 3-axis sensors.
pub const N_XYZ_COORDINATES: usize = 3;
