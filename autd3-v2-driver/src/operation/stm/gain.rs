use crate::{
    cpu::{CPUControlFlags, GainSTMMode, TxDatagram},
    error::AUTDInternalError,
    firmware::Mode,
    fpga::{normal_duty, normal_phase, Drive, LegacyDrive},
    geometry::Geometry,
};

use super::{super::Operation, set_stm_flags, validate_body_size, validate_idx};

/// Words of the metadata frame: freq_div (2), mode, number of gains, start, finish.
pub const GAIN_STM_HEAD_WORDS: usize = 6;

/// Streams a sequence of drive tables that the FPGA steps through at `FPGA_CLK / freq_div` Hz.
///
/// The first frame carries only the metadata. Each following frame carries drive
/// data, packed according to the [`GainSTMMode`] and the output mode.
pub struct GainSTMOp {
    gains: Vec<Vec<Drive>>,
    freq_div: u32,
    mode: GainSTMMode,
    start_idx: Option<u16>,
    finish_idx: Option<u16>,
    head_sent: bool,
    sent: usize,
    duty_pending: bool,
}

impl GainSTMOp {
    /// Each entry of `gains` holds one drive per transducer, device by device.
    pub const fn new(gains: Vec<Vec<Drive>>, freq_div: u32) -> Self {
        Self {
            gains,
            freq_div,
            mode: GainSTMMode::PhaseDutyFull,
            start_idx: None,
            finish_idx: None,
            head_sent: false,
            sent: 0,
            duty_pending: false,
        }
    }

    pub fn with_mode(self, mode: GainSTMMode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_start_idx(self, start_idx: Option<u16>) -> Self {
        Self { start_idx, ..self }
    }

    pub fn with_finish_idx(self, finish_idx: Option<u16>) -> Self {
        Self { finish_idx, ..self }
    }

    pub fn gains(&self) -> &[Vec<Drive>] {
        &self.gains
    }

    pub const fn mode(&self) -> GainSTMMode {
        self.mode
    }

    pub const fn freq_div(&self) -> u32 {
        self.freq_div
    }

    /// Number of gains fully packed.
    pub const fn sent(&self) -> usize {
        self.sent
    }

    /// Gains carried by one drive frame.
    pub const fn gains_per_frame(mode: Mode, stm_mode: GainSTMMode) -> usize {
        match (mode, stm_mode) {
            (Mode::Legacy, GainSTMMode::PhaseFull) => 2,
            (Mode::Legacy, GainSTMMode::PhaseHalf) => 4,
            _ => 1,
        }
    }

    fn validate(&self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        let limits = geometry.limits();
        let len = self.gains.len();
        if !(limits.gain_stm_buf_size_min..=limits.gain_stm_buf_size_max).contains(&len) {
            return Err(AUTDInternalError::GainSTMSizeOutOfRange(
                len,
                limits.gain_stm_buf_size_min,
                limits.gain_stm_buf_size_max,
            ));
        }
        if self.freq_div < limits.gain_stm_sampling_freq_div_min {
            return Err(AUTDInternalError::GainSTMFreqDivOutOfRange(
                self.freq_div,
                limits.gain_stm_sampling_freq_div_min,
            ));
        }
        if !geometry.mode().is_legacy() && self.mode == GainSTMMode::PhaseHalf {
            return Err(AUTDInternalError::GainSTMModeNotSupported(self.mode));
        }
        validate_idx(geometry, len, self.start_idx, self.finish_idx)?;
        validate_body_size(geometry, GAIN_STM_HEAD_WORDS)
    }

    fn pack_head(&self, tx: &mut TxDatagram) {
        let start_idx = self.start_idx.unwrap_or(0);
        let finish_idx = self.finish_idx.unwrap_or(0);
        tx.for_each_body_mut(|_, body| {
            body[0] = self.freq_div as u16;
            body[1] = (self.freq_div >> 16) as u16;
            body[2] = self.mode as u16;
            body[3] = self.gains.len() as u16;
            body[4] = start_idx;
            body[5] = finish_idx;
        });
    }

    fn pack_legacy(&self, geometry: &Geometry, tx: &mut TxDatagram, gains: &[Vec<Drive>]) {
        let mut offset = 0;
        geometry.iter().for_each(|dev| {
            let body = tx.body_mut(dev.idx());
            body.iter_mut().enumerate().for_each(|(i, d)| {
                let drive = |k: usize| gains.get(k).map(|g| LegacyDrive::from(&g[offset + i]));
                *d = match self.mode {
                    GainSTMMode::PhaseDutyFull => drive(0).map_or(0, |l| l.word()),
                    GainSTMMode::PhaseFull => (0..2)
                        .filter_map(|k| drive(k).map(|l| (l.phase as u16) << (8 * k)))
                        .fold(0, |acc, v| acc | v),
                    GainSTMMode::PhaseHalf => (0..4)
                        .filter_map(|k| drive(k).map(|l| ((l.phase >> 4) as u16) << (4 * k)))
                        .fold(0, |acc, v| acc | v),
                };
            });
            offset += dev.num_transducers();
        });
    }

    fn pack_normal(&self, geometry: &Geometry, tx: &mut TxDatagram, drives: &[Drive], duty: bool) {
        let mut drives = drives.iter();
        geometry.iter().for_each(|dev| {
            tx.body_mut(dev.idx())
                .iter_mut()
                .zip(dev.cycles())
                .zip(drives.by_ref())
                .for_each(|((d, &cycle), s)| {
                    *d = if duty {
                        normal_duty(s, cycle)
                    } else {
                        normal_phase(s, cycle)
                    }
                });
        });
    }
}

impl Operation for GainSTMOp {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        self.gains.iter().for_each(|g| {
            assert_eq!(
                geometry.num_transducers(),
                g.len(),
                "number of drives must match the number of transducers"
            )
        });
        self.validate(geometry)?;
        self.head_sent = false;
        self.sent = 0;
        self.duty_pending = false;
        Ok(())
    }

    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        if !self.head_sent {
            self.validate(geometry)?;
            self.pack_head(tx);
            set_stm_flags(
                geometry,
                tx,
                true,
                self.start_idx,
                self.finish_idx,
                true,
                false,
            );
            tx.write_all_bodies();
            self.head_sent = true;
            return Ok(());
        }

        match geometry.mode() {
            Mode::Legacy => {
                let n = Self::gains_per_frame(Mode::Legacy, self.mode)
                    .min(self.gains.len() - self.sent);
                self.pack_legacy(geometry, tx, &self.gains[self.sent..self.sent + n]);
                self.sent += n;
            }
            Mode::Normal | Mode::NormalPhase => {
                let drives = &self.gains[self.sent];
                if self.duty_pending {
                    self.pack_normal(geometry, tx, drives, true);
                    tx.header_mut().cpu_flag.set(CPUControlFlags::IS_DUTY, true);
                    self.duty_pending = false;
                    self.sent += 1;
                } else {
                    self.pack_normal(geometry, tx, drives, false);
                    if self.mode == GainSTMMode::PhaseDutyFull
                        && geometry.mode().num_gain_passes() > 1
                    {
                        self.duty_pending = true;
                    } else {
                        self.sent += 1;
                    }
                }
            }
        }

        set_stm_flags(
            geometry,
            tx,
            true,
            self.start_idx,
            self.finish_idx,
            false,
            self.is_finished(),
        );
        tx.write_all_bodies();

        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.head_sent && self.sent == self.gains.len() && !self.duty_pending
    }
}
