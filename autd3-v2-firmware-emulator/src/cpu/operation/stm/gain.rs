use autd3_v2_driver::{
    cpu::{CPUControlFlags, GainSTMMode, GlobalHeader},
    fpga::{FPGAControlFlags, LegacyDrive},
};

use crate::{
    cpu::{operation::gain::decode_legacy, params::*},
    error::EmulatorError,
    fpga::params::GAIN_STM_BUF_SIZE_MAX,
    CPUEmulator,
};

use super::{check_idx_range, check_idx_supported, read_u32};

impl CPUEmulator {
    pub(crate) fn write_gain_stm(
        &mut self,
        header: &GlobalHeader,
        body: &[u16],
    ) -> Result<(), EmulatorError> {
        if header.cpu_flag.contains(CPUControlFlags::STM_BEGIN) {
            return self.begin_gain_stm(header, body);
        }

        let cursor = self.stm_write.ok_or(EmulatorError::StreamNotStarted)?;
        let cursor = if header.fpga_flag.contains(FPGAControlFlags::LEGACY_MODE) {
            self.write_gain_stm_legacy(cursor, body)?
        } else {
            self.write_gain_stm_normal(header, cursor, body)?
        };

        if header.cpu_flag.contains(CPUControlFlags::STM_END) {
            self.fpga.stm_cycle = cursor;
            self.stm_write = None;
        } else {
            self.stm_write = Some(cursor);
        }
        Ok(())
    }

    fn begin_gain_stm(
        &mut self,
        header: &GlobalHeader,
        body: &[u16],
    ) -> Result<(), EmulatorError> {
        let limits = self.limits(header.fpga_flag);
        let is_legacy = header.fpga_flag.contains(FPGAControlFlags::LEGACY_MODE);
        if body.len() < GAIN_STM_HEAD_WORDS {
            return Err(EmulatorError::STMBufferOverflow);
        }

        let mode = match GainSTMMode::from_u16(body[GAIN_STM_MODE_IDX]) {
            Some(GainSTMMode::PhaseHalf) if !is_legacy => None,
            m => m,
        }
        .ok_or(EmulatorError::InvalidGainSTMMode(body[GAIN_STM_MODE_IDX]))?;
        check_idx_supported(limits, header.fpga_flag)?;

        let freq_div = read_u32(body, GAIN_STM_FREQ_DIV_IDX);
        if freq_div < limits.gain_stm_sampling_freq_div_min {
            return Err(EmulatorError::STMFreqDivTooSmall(freq_div));
        }
        let n = body[GAIN_STM_SIZE_IDX] as usize;
        if n > limits.gain_stm_buf_size_max.min(GAIN_STM_BUF_SIZE_MAX) {
            return Err(EmulatorError::STMBufferOverflow);
        }
        let start_idx = body[GAIN_STM_START_IDX_IDX];
        let finish_idx = body[GAIN_STM_FINISH_IDX_IDX];
        check_idx_range(header.fpga_flag, start_idx, finish_idx, n)?;

        self.fpga.stm_freq_div = freq_div;
        self.fpga.gain_stm_mode = mode;
        self.fpga.stm_start_idx = start_idx;
        self.fpga.stm_finish_idx = finish_idx;
        self.fpga.gains = vec![vec![(0, 0); self.num_transducers]; n];
        self.fpga.stm_cycle = 0;
        self.stm_write = Some(0);
        Ok(())
    }

    fn write_gain_stm_legacy(
        &mut self,
        cursor: usize,
        body: &[u16],
    ) -> Result<usize, EmulatorError> {
        let total = self.fpga.gains.len();
        if cursor >= total {
            return Err(EmulatorError::STMBufferOverflow);
        }
        let mode = self.fpga.gain_stm_mode;
        let per_frame = match mode {
            GainSTMMode::PhaseFull => 2,
            GainSTMMode::PhaseHalf => 4,
            GainSTMMode::PhaseDutyFull => 1,
        };
        let n = per_frame.min(total - cursor);

        self.fpga.gains[cursor..cursor + n]
            .iter_mut()
            .enumerate()
            .for_each(|(k, gain)| {
                gain.iter_mut().zip(body.iter()).for_each(|(d, &w)| {
                    *d = match mode {
                        GainSTMMode::PhaseFull => {
                            decode_legacy(LEGACY_DUTY_FULL, (w >> (8 * k)) as u8)
                        }
                        GainSTMMode::PhaseHalf => {
                            let nibble = (w >> (4 * k)) & 0x0F;
                            decode_legacy(LEGACY_DUTY_FULL, (nibble << 4) as u8)
                        }
                        GainSTMMode::PhaseDutyFull => {
                            let l = LegacyDrive::from_word(w);
                            decode_legacy(l.duty, l.phase)
                        }
                    }
                });
            });
        Ok(cursor + n)
    }

    fn write_gain_stm_normal(
        &mut self,
        header: &GlobalHeader,
        cursor: usize,
        body: &[u16],
    ) -> Result<usize, EmulatorError> {
        if header.cpu_flag.contains(CPUControlFlags::IS_DUTY) {
            let gain = cursor
                .checked_sub(1)
                .and_then(|i| self.fpga.gains.get_mut(i))
                .ok_or(EmulatorError::StreamNotStarted)?;
            gain.iter_mut()
                .zip(body.iter())
                .for_each(|(d, &w)| d.0 = w);
            return Ok(cursor);
        }

        let gain = self
            .fpga
            .gains
            .get_mut(cursor)
            .ok_or(EmulatorError::STMBufferOverflow)?;
        gain.iter_mut()
            .zip(self.fpga.cycles.iter())
            .zip(body.iter())
            .for_each(|((d, &cycle), &w)| *d = (cycle >> 1, w));
        Ok(cursor + 1)
    }
}
