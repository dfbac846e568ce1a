use crate::defined::PI;

/// Target phase (rad) and normalized amplitude of one transducer.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Drive {
    pub phase: f64,
    pub amp: f64,
}

impl Drive {
    pub const fn new(phase: f64, amp: f64) -> Self {
        Self { phase, amp }
    }

    pub const fn null() -> Self {
        Self { phase: 0., amp: 0. }
    }
}

/// Phase/duty pair of a transducer in legacy mode, packed as `duty << 8 | phase`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegacyDrive {
    pub phase: u8,
    pub duty: u8,
}

impl LegacyDrive {
    pub fn to_phase(d: &Drive) -> u8 {
        ((d.phase / (2.0 * PI) * 256.0).round() as i32).rem_euclid(256) as u8
    }

    pub fn to_duty(d: &Drive) -> u8 {
        (510.0 * d.amp.clamp(0., 1.).asin() / PI).round().min(255.) as u8
    }

    pub const fn word(&self) -> u16 {
        ((self.duty as u16) << 8) | self.phase as u16
    }

    pub const fn from_word(word: u16) -> Self {
        Self {
            phase: (word & 0xFF) as u8,
            duty: (word >> 8) as u8,
        }
    }
}

impl From<&Drive> for LegacyDrive {
    fn from(d: &Drive) -> Self {
        Self {
            phase: Self::to_phase(d),
            duty: Self::to_duty(d),
        }
    }
}

/// Phase quantized to `cycle` steps.
pub fn normal_phase(d: &Drive, cycle: u16) -> u16 {
    let cycle = cycle as i64;
    ((d.phase / (2.0 * PI) * cycle as f64).round() as i64).rem_euclid(cycle) as u16
}

/// Duty ratio of a rectangular wave of period `cycle` emitting amplitude `d.amp`.
pub fn normal_duty(d: &Drive, cycle: u16) -> u16 {
    (cycle as f64 * d.amp.clamp(0., 1.).asin() / PI).round() as u16
}
