use super::FPGAEmulator;

impl FPGAEmulator {
    /// Samples of the modulation currently played.
    pub fn modulation(&self) -> &[u8] {
        &self.modulation[..self.mod_cycle]
    }

    pub const fn modulation_cycle(&self) -> usize {
        self.mod_cycle
    }

    pub const fn modulation_frequency_division(&self) -> u32 {
        self.mod_freq_div
    }

    /// Index of the modulation sample played at the current system time.
    pub const fn current_mod_idx(&self) -> usize {
        if self.mod_cycle == 0 || self.mod_freq_div == 0 {
            return 0;
        }
        ((Self::fpga_clocks(self.sys_time()) / self.mod_freq_div as u128) % self.mod_cycle as u128)
            as usize
    }

    /// Modulation index seen by transducer `idx`, lagging the device-wide
    /// index by its modulation delay.
    pub fn delayed_mod_idx(&self, idx: usize) -> usize {
        if self.mod_cycle == 0 {
            return 0;
        }
        let delay = self.mod_delays[idx] as usize % self.mod_cycle;
        (self.current_mod_idx() + self.mod_cycle - delay) % self.mod_cycle
    }
}
