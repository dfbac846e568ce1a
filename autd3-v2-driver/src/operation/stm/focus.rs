use crate::{
    cpu::TxDatagram,
    error::AUTDInternalError,
    fpga::STMFocus,
    geometry::{Geometry, Vector3},
};

use super::{super::Operation, set_stm_flags, validate_body_size, validate_idx};

/// Words preceding the foci in the first frame: size, freq_div (2), sound speed (2), start, finish.
pub const FOCUS_STM_HEAD_WORDS: usize = 7;
/// Words preceding the foci in the following frames: size.
pub const FOCUS_STM_BODY_WORDS: usize = 1;
const FOCUS_WORDS: usize = size_of::<STMFocus>() / size_of::<u16>();

/// A focus of a focus STM, in mm relative to the device origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    point: Vector3,
    duty_shift: u8,
}

impl ControlPoint {
    pub const fn new(point: Vector3) -> Self {
        Self {
            point,
            duty_shift: 0,
        }
    }

    /// Duty is `cycle >> (duty_shift + 1)`.
    pub const fn with_duty_shift(self, duty_shift: u8) -> Self {
        Self { duty_shift, ..self }
    }

    pub const fn point(&self) -> &Vector3 {
        &self.point
    }

    pub const fn duty_shift(&self) -> u8 {
        self.duty_shift
    }
}

impl From<Vector3> for ControlPoint {
    fn from(point: Vector3) -> Self {
        Self::new(point)
    }
}

/// Streams a sequence of foci that the FPGA steps through at `FPGA_CLK / freq_div` Hz.
///
/// Every device receives the same foci. The number of foci in a frame is bounded
/// by the smallest device.
pub struct FocusSTMOp {
    points: Vec<ControlPoint>,
    freq_div: u32,
    start_idx: Option<u16>,
    finish_idx: Option<u16>,
    sent: usize,
    validated: bool,
}

impl FocusSTMOp {
    pub const fn new(points: Vec<ControlPoint>, freq_div: u32) -> Self {
        Self {
            points,
            freq_div,
            start_idx: None,
            finish_idx: None,
            sent: 0,
            validated: false,
        }
    }

    pub fn with_start_idx(self, start_idx: Option<u16>) -> Self {
        Self { start_idx, ..self }
    }

    pub fn with_finish_idx(self, finish_idx: Option<u16>) -> Self {
        Self { finish_idx, ..self }
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub const fn freq_div(&self) -> u32 {
        self.freq_div
    }

    /// Number of foci already packed.
    pub const fn sent(&self) -> usize {
        self.sent
    }

    fn capacity(geometry: &Geometry, is_first: bool) -> usize {
        let head = if is_first {
            FOCUS_STM_HEAD_WORDS
        } else {
            FOCUS_STM_BODY_WORDS
        };
        geometry
            .iter()
            .map(|dev| (dev.num_transducers() - head) / FOCUS_WORDS)
            .min()
            .unwrap_or(0)
    }

    fn validate(&self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        let limits = geometry.limits();
        let len = self.points.len();
        if !(limits.focus_stm_buf_size_min..=limits.focus_stm_buf_size_max).contains(&len) {
            return Err(AUTDInternalError::FocusSTMPointSizeOutOfRange(
                len,
                limits.focus_stm_buf_size_min,
                limits.focus_stm_buf_size_max,
            ));
        }
        if self.freq_div < limits.focus_stm_sampling_freq_div_min {
            return Err(AUTDInternalError::FocusSTMFreqDivOutOfRange(
                self.freq_div,
                limits.focus_stm_sampling_freq_div_min,
            ));
        }
        validate_idx(geometry, len, self.start_idx, self.finish_idx)?;
        validate_body_size(geometry, FOCUS_STM_HEAD_WORDS + FOCUS_WORDS)?;
        self.points
            .iter()
            .try_for_each(|p| STMFocus::create(&p.point, p.duty_shift).map(|_| ()))
    }
}

impl Operation for FocusSTMOp {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        self.validate(geometry)?;
        self.sent = 0;
        self.validated = true;
        Ok(())
    }

    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        let is_first = self.sent == 0;
        if is_first && !self.validated {
            self.validate(geometry)?;
            self.validated = true;
        }

        let size = (self.points.len() - self.sent).min(Self::capacity(geometry, is_first));
        let is_last = self.sent + size == self.points.len();

        let foci = self.points[self.sent..self.sent + size]
            .iter()
            .map(|p| STMFocus::create(&p.point, p.duty_shift))
            .collect::<Result<Vec<_>, _>>()?;

        let sound_speed = (geometry.sound_speed() * 1024.0).round() as u32;
        let start_idx = self.start_idx.unwrap_or(0);
        let finish_idx = self.finish_idx.unwrap_or(0);
        tx.for_each_body_mut(|_, body| {
            body[0] = size as u16;
            let head = if is_first {
                body[1] = self.freq_div as u16;
                body[2] = (self.freq_div >> 16) as u16;
                body[3] = sound_speed as u16;
                body[4] = (sound_speed >> 16) as u16;
                body[5] = start_idx;
                body[6] = finish_idx;
                FOCUS_STM_HEAD_WORDS
            } else {
                FOCUS_STM_BODY_WORDS
            };
            body[head..]
                .chunks_exact_mut(FOCUS_WORDS)
                .zip(foci.iter())
                .for_each(|(dst, f)| dst.copy_from_slice(&f.words()));
        });

        set_stm_flags(
            geometry,
            tx,
            false,
            self.start_idx,
            self.finish_idx,
            is_first,
            is_last,
        );
        tx.write_all_bodies();

        self.sent += size;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent == self.points.len()
    }
}
