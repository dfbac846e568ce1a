use autd3_v2_driver::cpu::{CPUControlFlags, GlobalHeader};

use crate::{cpu::params::*, error::EmulatorError, fpga::params::MOD_BUF_SIZE_MAX, CPUEmulator};

impl CPUEmulator {
    pub(crate) fn write_mod(&mut self, header: &GlobalHeader) -> Result<(), EmulatorError> {
        let limits = self.limits(header.fpga_flag);
        let is_begin = header.cpu_flag.contains(CPUControlFlags::MOD_BEGIN);
        let is_end = header.cpu_flag.contains(CPUControlFlags::MOD_END);
        let size = header.size as usize;

        let freq_div = header.read_u32(MOD_FREQ_DIV_OFFSET);
        let (cursor, samples) = if is_begin {
            if freq_div < limits.mod_sampling_freq_div_min {
                return Err(EmulatorError::ModulationFreqDivTooSmall(freq_div));
            }
            (0, &header.data[MOD_HEAD_DATA_OFFSET..])
        } else {
            (
                self.mod_write.ok_or(EmulatorError::StreamNotStarted)?,
                &header.data[..],
            )
        };

        let end = cursor + size;
        if size > samples.len() || end > limits.mod_buf_size_max.min(MOD_BUF_SIZE_MAX) {
            return Err(EmulatorError::ModulationBufferOverflow);
        }

        if is_begin {
            self.fpga.mod_freq_div = freq_div;
        }
        self.fpga.modulation[cursor..end].copy_from_slice(&samples[..size]);
        if is_end {
            self.fpga.mod_cycle = end;
            self.mod_write = None;
        } else {
            self.mod_write = Some(end);
        }
        Ok(())
    }
}
