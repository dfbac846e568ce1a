use autd3_v2_driver::{
    autd3_device::AUTD3,
    cpu::GainSTMMode,
    defined::{METER, ULTRASOUND_FREQUENCY},
    fpga::{FPGAControlFlags, STMFocus, FOCUS_STM_FIXED_NUM_UNIT},
};
use num::integer::Roots;

use super::FPGAEmulator;

impl FPGAEmulator {
    pub const fn stm_cycle(&self) -> usize {
        self.stm_cycle
    }

    pub const fn stm_frequency_division(&self) -> u32 {
        self.stm_freq_div
    }

    pub const fn stm_start_idx(&self) -> Option<u16> {
        if self.flags.contains(FPGAControlFlags::USE_START_IDX) {
            Some(self.stm_start_idx)
        } else {
            None
        }
    }

    pub const fn stm_finish_idx(&self) -> Option<u16> {
        if self.flags.contains(FPGAControlFlags::USE_FINISH_IDX) {
            Some(self.stm_finish_idx)
        } else {
            None
        }
    }

    /// Sound speed of the focus STM in units of 1/1024 m/s.
    pub const fn sound_speed(&self) -> u32 {
        self.sound_speed
    }

    pub const fn gain_stm_mode(&self) -> GainSTMMode {
        self.gain_stm_mode
    }

    pub fn foci(&self) -> &[STMFocus] {
        &self.foci[..self.stm_cycle.min(self.foci.len())]
    }

    /// Index of the STM pattern played at the current system time.
    pub const fn current_stm_idx(&self) -> usize {
        if self.stm_cycle == 0 || self.stm_freq_div == 0 {
            return 0;
        }
        ((Self::fpga_clocks(self.sys_time()) / self.stm_freq_div as u128) % self.stm_cycle as u128)
            as usize
    }

    /// Drives focusing on `focus`.
    ///
    /// The distance is computed in the fixed point unit of the focus with an
    /// integer square root. The phase is the distance in wavelengths times the
    /// cycle of each transducer, and the duty is `cycle >> (duty_shift + 1)`.
    pub(crate) fn focus_drives(&self, focus: &STMFocus) -> Vec<(u16, u16)> {
        let wavelength = self.sound_speed as f64 / 1024.0 * METER / ULTRASOUND_FREQUENCY;
        let to_fixed = |v: f64| (v / FOCUS_STM_FIXED_NUM_UNIT).round() as i64;
        self.cycles
            .iter()
            .enumerate()
            .map(|(i, &cycle)| {
                let p = AUTD3::local_position(i);
                let dx = focus.x() as i64 - to_fixed(p.x);
                let dy = focus.y() as i64 - to_fixed(p.y);
                let dz = focus.z() as i64 - to_fixed(p.z);
                let dist = Roots::sqrt(&((dx * dx + dy * dy + dz * dz) as u64)) as f64
                    * FOCUS_STM_FIXED_NUM_UNIT;
                let phase =
                    ((dist / wavelength * cycle as f64).round() as u64 % cycle as u64) as u16;
                let duty = cycle
                    .checked_shr(focus.duty_shift() as u32 + 1)
                    .unwrap_or(0);
                (duty, phase)
            })
            .collect()
    }
}
