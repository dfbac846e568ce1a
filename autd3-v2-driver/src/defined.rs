pub use std::f64::consts::PI;

pub const METER: f64 = 1000.0;
pub const MILLIMETER: f64 = METER / 1000.0;

/// Ultrasound frequency of the T4010A1 transducer
pub const ULTRASOUND_FREQUENCY: f64 = 40e3;

/// Default speed of sound in m/s
pub const DEFAULT_SOUND_SPEED: f64 = 340.0;

pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(200);
