use crate::{defined::MILLIMETER, geometry::Vector3};

/// Transducer layout of the AUTD3 device.
pub struct AUTD3;

impl AUTD3 {
    /// The number of transducers in x-axis.
    pub const NUM_TRANS_X: usize = 18;
    /// The number of transducers in y-axis.
    pub const NUM_TRANS_Y: usize = 14;
    /// The number of transducers in a unit.
    pub const NUM_TRANS_IN_UNIT: usize = Self::NUM_TRANS_X * Self::NUM_TRANS_Y - 3;
    /// The spacing between transducers.
    pub const TRANS_SPACING: f64 = 10.16 * MILLIMETER;
    /// The width of the device (including the substrate).
    pub const DEVICE_WIDTH: f64 = 192.0 * MILLIMETER;
    /// The height of the device (including the substrate).
    pub const DEVICE_HEIGHT: f64 = 151.4 * MILLIMETER;

    pub const fn is_missing_transducer(x: usize, y: usize) -> bool {
        if Self::NUM_TRANS_X <= x || Self::NUM_TRANS_Y <= y {
            return true;
        }
        y == 1 && (x == 1 || x == 2 || x == 16)
    }

    /// Gets the index in x- and y-axis from the transducer index.
    pub const fn grid_id(idx: usize) -> (usize, usize) {
        let local_id = idx % Self::NUM_TRANS_IN_UNIT;
        let uid = match local_id {
            0..19 => local_id,
            19..32 => local_id + 2,
            _ => local_id + 3,
        };
        (uid % Self::NUM_TRANS_X, uid / Self::NUM_TRANS_X)
    }

    /// Position of the transducer `idx` in the device coordinate, in mm.
    pub fn local_position(idx: usize) -> Vector3 {
        let (x, y) = Self::grid_id(idx);
        Vector3::new(
            x as f64 * Self::TRANS_SPACING,
            y as f64 * Self::TRANS_SPACING,
            0.,
        )
    }
}
