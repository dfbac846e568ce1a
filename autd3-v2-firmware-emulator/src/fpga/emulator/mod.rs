mod modulation;
mod silencer;
mod stm;

use autd3_v2_driver::{
    cpu::GainSTMMode,
    defined::DEFAULT_SOUND_SPEED,
    ethercat::DcSysTime,
    fpga::{
        FPGAControlFlags, FPGAInfo, STMFocus, DEFAULT_CYCLE, FPGA_CLK_FREQ,
        MOD_SAMPLING_FREQ_DIV_DEFAULT, SILENCER_CYCLE_DEFAULT, SILENCER_STEP_DEFAULT,
    },
};

use super::params::*;

/// Emulated FPGA of one device.
///
/// Holds the tables written by the CPU and models the output stage: playback
/// cursors derived from the system time and the silencer between target and
/// emitted drives. Drives are `(duty, phase)` pairs in FPGA clocks.
pub struct FPGAEmulator {
    pub(crate) num_transducers: usize,
    pub(crate) flags: FPGAControlFlags,
    pub(crate) cycles: Vec<u16>,
    pub(crate) drives: Vec<(u16, u16)>,
    pub(crate) modulation: Vec<u8>,
    pub(crate) mod_cycle: usize,
    pub(crate) mod_freq_div: u32,
    pub(crate) mod_delays: Vec<u16>,
    pub(crate) duty_filters: Vec<i16>,
    pub(crate) phase_filters: Vec<i16>,
    pub(crate) silencer_cycle: u16,
    pub(crate) silencer_step: u16,
    pub(crate) stm_cycle: usize,
    pub(crate) stm_freq_div: u32,
    pub(crate) stm_start_idx: u16,
    pub(crate) stm_finish_idx: u16,
    pub(crate) sound_speed: u32,
    pub(crate) gain_stm_mode: GainSTMMode,
    pub(crate) foci: Vec<STMFocus>,
    pub(crate) gains: Vec<Vec<(u16, u16)>>,
    pub(crate) emitted: Vec<(u16, u16)>,
    thermo: bool,
    sys_time: DcSysTime,
}

impl FPGAEmulator {
    pub(crate) fn new(num_transducers: usize) -> Self {
        let mut fpga = Self {
            num_transducers,
            flags: FPGAControlFlags::NONE,
            cycles: Vec::new(),
            drives: Vec::new(),
            modulation: Vec::new(),
            mod_cycle: 0,
            mod_freq_div: 0,
            mod_delays: Vec::new(),
            duty_filters: Vec::new(),
            phase_filters: Vec::new(),
            silencer_cycle: 0,
            silencer_step: 0,
            stm_cycle: 0,
            stm_freq_div: 0,
            stm_start_idx: 0,
            stm_finish_idx: 0,
            sound_speed: 0,
            gain_stm_mode: GainSTMMode::PhaseDutyFull,
            foci: Vec::new(),
            gains: Vec::new(),
            emitted: Vec::new(),
            thermo: false,
            sys_time: DcSysTime::ZERO,
        };
        fpga.init();
        fpga
    }

    /// Restores the power-on state of every table. The thermal sensor and the
    /// system time are not affected.
    pub(crate) fn init(&mut self) {
        let n = self.num_transducers;
        self.flags = FPGAControlFlags::NONE;
        self.cycles = vec![DEFAULT_CYCLE; n];
        self.drives = vec![(0, 0); n];
        self.modulation = vec![0; MOD_BUF_SIZE_MAX];
        self.mod_cycle = MOD_CYCLE_DEFAULT;
        self.mod_freq_div = MOD_SAMPLING_FREQ_DIV_DEFAULT;
        self.mod_delays = vec![0; n];
        self.duty_filters = vec![0; n];
        self.phase_filters = vec![0; n];
        self.silencer_cycle = SILENCER_CYCLE_DEFAULT;
        self.silencer_step = SILENCER_STEP_DEFAULT;
        self.stm_cycle = 0;
        self.stm_freq_div = 0;
        self.stm_start_idx = 0;
        self.stm_finish_idx = 0;
        self.sound_speed = (DEFAULT_SOUND_SPEED * 1024.0).round() as u32;
        self.gain_stm_mode = GainSTMMode::PhaseDutyFull;
        self.foci.clear();
        self.gains.clear();
        self.emitted = vec![(0, 0); n];
    }

    pub(crate) const fn fpga_clocks(sys_time: DcSysTime) -> u128 {
        sys_time.sys_time() as u128 * FPGA_CLK_FREQ as u128 / NANOS_PER_SEC
    }

    /// Advances the playback cursors to `sys_time` and lets the silencer move
    /// the emitted drives toward the current targets.
    pub fn update_with_sys_time(&mut self, sys_time: DcSysTime) {
        let cycle = self.silencer_cycle.max(1) as u128;
        let updates = (Self::fpga_clocks(sys_time) / cycle)
            .saturating_sub(Self::fpga_clocks(self.sys_time) / cycle);
        self.sys_time = sys_time;
        self.step_silencer(updates);
    }

    pub const fn sys_time(&self) -> DcSysTime {
        self.sys_time
    }

    pub const fn num_transducers(&self) -> usize {
        self.num_transducers
    }

    pub const fn fpga_flags(&self) -> FPGAControlFlags {
        self.flags
    }

    pub const fn is_legacy_mode(&self) -> bool {
        self.flags.contains(FPGAControlFlags::LEGACY_MODE)
    }

    pub const fn is_force_fan(&self) -> bool {
        self.flags.contains(FPGAControlFlags::FORCE_FAN)
    }

    pub const fn is_stm_mode(&self) -> bool {
        self.flags.contains(FPGAControlFlags::STM_MODE)
    }

    pub const fn is_stm_gain_mode(&self) -> bool {
        self.flags.contains(FPGAControlFlags::STM_GAIN_MODE)
    }

    pub const fn is_reads_fpga_info(&self) -> bool {
        self.flags.contains(FPGAControlFlags::READS_FPGA_INFO)
    }

    pub fn cycles(&self) -> &[u16] {
        &self.cycles
    }

    pub fn mod_delays(&self) -> &[u16] {
        &self.mod_delays
    }

    pub fn duty_filters(&self) -> &[i16] {
        &self.duty_filters
    }

    pub fn phase_filters(&self) -> &[i16] {
        &self.phase_filters
    }

    /// Drive table of `stm_idx` in STM mode, or the gain table otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `stm_idx` is not less than [`FPGAEmulator::stm_cycle`] in STM mode.
    pub fn duties_and_phases(&self, stm_idx: usize) -> Vec<(u16, u16)> {
        if !self.is_stm_mode() {
            return self.drives.clone();
        }
        if self.is_stm_gain_mode() {
            self.gains[stm_idx].clone()
        } else {
            self.focus_drives(&self.foci[stm_idx])
        }
    }

    /// Drives the output stage is heading for: the current drive table with
    /// the duty and phase filters applied.
    pub fn target_drives(&self) -> Vec<(u16, u16)> {
        let drives = if self.is_stm_mode() && self.stm_cycle > 0 {
            self.duties_and_phases(self.current_stm_idx())
        } else {
            self.drives.clone()
        };
        drives
            .into_iter()
            .enumerate()
            .map(|(i, (duty, phase))| {
                let cycle = self.cycles[i] as i32;
                let duty = (duty as i32 + self.duty_filters[i] as i32).clamp(0, cycle / 2);
                let phase = (phase as i32 + self.phase_filters[i] as i32).rem_euclid(cycle);
                (duty as u16, phase as u16)
            })
            .collect()
    }

    /// Drives currently emitted, after the silencer.
    pub fn output_drives(&self) -> &[(u16, u16)] {
        &self.emitted
    }

    pub const fn is_thermo_asserted(&self) -> bool {
        self.thermo
    }

    pub fn assert_thermal_sensor(&mut self) {
        self.thermo = true;
    }

    pub fn deassert_thermal_sensor(&mut self) {
        self.thermo = false;
    }

    pub const fn fpga_info(&self) -> FPGAInfo {
        FPGAInfo::new(if self.thermo {
            FPGAInfo::THERMAL_ASSERT_BIT
        } else {
            0
        })
    }
}
