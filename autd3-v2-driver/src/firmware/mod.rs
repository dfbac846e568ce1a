/// Buffer-size and sampling-divisor limits per operating mode and firmware revision.
pub mod limits;
/// Firmware version
pub mod version;

pub use limits::{limits_for, FirmwareRevision, Limits, Mode};
