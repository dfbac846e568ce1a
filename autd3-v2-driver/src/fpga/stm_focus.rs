use zerocopy::{Immutable, IntoBytes};

use crate::{error::AUTDInternalError, geometry::Vector3};

use super::*;

/// One focus of a focus STM in the fixed point format read by the FPGA.
#[bitfield_struct::bitfield(u64)]
#[derive(IntoBytes, Immutable, PartialEq, Eq)]
pub struct STMFocus {
    #[bits(18)]
    pub x: i32,
    #[bits(18)]
    pub y: i32,
    #[bits(18)]
    pub z: i32,
    #[bits(4)]
    pub duty_shift: u8,
    #[bits(6)]
    __: u8,
}

impl STMFocus {
    fn to_fixed_num(x: f64) -> i32 {
        (x / FOCUS_STM_FIXED_NUM_UNIT).round() as i32
    }

    pub fn create(p: &Vector3, duty_shift: u8) -> Result<Self, AUTDInternalError> {
        let ix = Self::to_fixed_num(p.x);
        let iy = Self::to_fixed_num(p.y);
        let iz = Self::to_fixed_num(p.z);

        let range = FOCUS_STM_FIXED_NUM_LOWER..=FOCUS_STM_FIXED_NUM_UPPER;
        if !range.contains(&ix) || !range.contains(&iy) || !range.contains(&iz) {
            return Err(AUTDInternalError::FocusSTMPointOutOfRange(p.x, p.y, p.z));
        }
        if duty_shift > FOCUS_STM_DUTY_SHIFT_MAX {
            return Err(AUTDInternalError::DutyShiftOutOfRange(duty_shift));
        }

        Ok(Self::new()
            .with_x(ix)
            .with_y(iy)
            .with_z(iz)
            .with_duty_shift(duty_shift))
    }

    /// Position in mm.
    pub fn position(&self) -> Vector3 {
        Vector3::new(
            self.x() as f64 * FOCUS_STM_FIXED_NUM_UNIT,
            self.y() as f64 * FOCUS_STM_FIXED_NUM_UNIT,
            self.z() as f64 * FOCUS_STM_FIXED_NUM_UNIT,
        )
    }

    /// Splits into the four body words it occupies.
    pub fn words(&self) -> [u16; 4] {
        let v = self.into_bits();
        [v as u16, (v >> 16) as u16, (v >> 32) as u16, (v >> 48) as u16]
    }

    pub fn from_words(words: &[u16]) -> Self {
        Self::from_bits(
            words[0] as u64
                | (words[1] as u64) << 16
                | (words[2] as u64) << 32
                | (words[3] as u64) << 48,
        )
    }
}
