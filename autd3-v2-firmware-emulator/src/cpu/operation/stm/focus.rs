use autd3_v2_driver::{
    cpu::{CPUControlFlags, GlobalHeader},
    fpga::STMFocus,
};

use crate::{
    cpu::params::*, error::EmulatorError, fpga::params::FOCUS_STM_BUF_SIZE_MAX, CPUEmulator,
};

use super::{check_idx_range, check_idx_supported, read_u32};

impl CPUEmulator {
    pub(crate) fn write_focus_stm(
        &mut self,
        header: &GlobalHeader,
        body: &[u16],
    ) -> Result<(), EmulatorError> {
        let limits = self.limits(header.fpga_flag);
        let is_begin = header.cpu_flag.contains(CPUControlFlags::STM_BEGIN);
        let is_end = header.cpu_flag.contains(CPUControlFlags::STM_END);
        let head = if is_begin {
            FOCUS_STM_HEAD_WORDS
        } else {
            FOCUS_STM_BODY_WORDS
        };
        if body.len() < head {
            return Err(EmulatorError::STMBufferOverflow);
        }
        let size = body[FOCUS_STM_SIZE_IDX] as usize;

        let cursor = if is_begin {
            check_idx_supported(limits, header.fpga_flag)?;
            let freq_div = read_u32(body, FOCUS_STM_FREQ_DIV_IDX);
            if freq_div < limits.focus_stm_sampling_freq_div_min {
                return Err(EmulatorError::STMFreqDivTooSmall(freq_div));
            }
            0
        } else {
            self.stm_write.ok_or(EmulatorError::StreamNotStarted)?
        };

        let total = cursor + size;
        if head + size * FOCUS_WORDS > body.len()
            || total > limits.focus_stm_buf_size_max.min(FOCUS_STM_BUF_SIZE_MAX)
        {
            return Err(EmulatorError::STMBufferOverflow);
        }

        let (start_idx, finish_idx) = if is_begin {
            (
                body[FOCUS_STM_START_IDX_IDX],
                body[FOCUS_STM_FINISH_IDX_IDX],
            )
        } else {
            (self.fpga.stm_start_idx, self.fpga.stm_finish_idx)
        };
        if is_end {
            check_idx_range(header.fpga_flag, start_idx, finish_idx, total)?;
        }

        if is_begin {
            self.fpga.stm_freq_div = read_u32(body, FOCUS_STM_FREQ_DIV_IDX);
            self.fpga.sound_speed = read_u32(body, FOCUS_STM_SOUND_SPEED_IDX);
            self.fpga.stm_start_idx = start_idx;
            self.fpga.stm_finish_idx = finish_idx;
            self.fpga.stm_cycle = 0;
        }
        self.fpga.foci.truncate(cursor);
        self.fpga.foci.extend(
            body[head..head + size * FOCUS_WORDS]
                .chunks_exact(FOCUS_WORDS)
                .map(STMFocus::from_words),
        );

        if is_end {
            self.fpga.stm_cycle = total;
            self.stm_write = None;
        } else {
            self.stm_write = Some(total);
        }
        Ok(())
    }
}
