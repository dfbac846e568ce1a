use crate::{
    cpu::{CPUControlFlags, TxDatagram},
    error::AUTDInternalError,
    geometry::Geometry,
};

use super::Operation;

/// Samples carried by the first modulation frame. The first 4 bytes of the header payload hold the sampling frequency division.
pub const MOD_HEAD_DATA_SIZE: usize = 120;
/// Samples carried by each following modulation frame.
pub const MOD_BODY_DATA_SIZE: usize = 124;

/// Streams a modulation buffer through the header payload.
pub struct ModulationOp {
    buf: Vec<u8>,
    freq_div: u32,
    sent: usize,
}

impl ModulationOp {
    pub const fn new(buf: Vec<u8>, freq_div: u32) -> Self {
        Self {
            buf,
            freq_div,
            sent: 0,
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    pub const fn freq_div(&self) -> u32 {
        self.freq_div
    }

    /// Number of samples already packed.
    pub const fn sent(&self) -> usize {
        self.sent
    }

    fn validate(&self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        let limits = geometry.limits();
        if !(limits.mod_buf_size_min..=limits.mod_buf_size_max).contains(&self.buf.len()) {
            return Err(AUTDInternalError::ModulationSizeOutOfRange(
                self.buf.len(),
                limits.mod_buf_size_min,
                limits.mod_buf_size_max,
            ));
        }
        if self.freq_div < limits.mod_sampling_freq_div_min {
            return Err(AUTDInternalError::ModFreqDivOutOfRange(
                self.freq_div,
                limits.mod_sampling_freq_div_min,
            ));
        }
        Ok(())
    }
}

impl Operation for ModulationOp {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        self.validate(geometry)?;
        self.sent = 0;
        Ok(())
    }

    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        let is_first = self.sent == 0;
        if is_first {
            self.validate(geometry)?;
        }

        let capacity = if is_first {
            MOD_HEAD_DATA_SIZE
        } else {
            MOD_BODY_DATA_SIZE
        };
        let size = (self.buf.len() - self.sent).min(capacity);
        let is_last = self.sent + size == self.buf.len();

        let header = tx.header_mut();
        header.cpu_flag.set(CPUControlFlags::MOD, true);
        header.cpu_flag.set(CPUControlFlags::MOD_BEGIN, is_first);
        header.cpu_flag.set(CPUControlFlags::MOD_END, is_last);
        header.size = size as u8;

        let samples = &self.buf[self.sent..self.sent + size];
        if is_first {
            header.write_u32(0, self.freq_div);
            header.data[4..4 + size].copy_from_slice(samples);
        } else {
            header.data[..size].copy_from_slice(samples);
        }
        tx.set_num_bodies(0);

        self.sent += size;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent == self.buf.len()
    }
}
