use autd3_v2_driver::cpu::{GlobalHeader, BODY_TARGET_DUTY_FILTER};

use crate::{cpu::params::*, error::EmulatorError, CPUEmulator};

impl CPUEmulator {
    pub(super) fn write_filter(
        &mut self,
        header: &GlobalHeader,
        body: &[u16],
    ) -> Result<(), EmulatorError> {
        if !self.limits(header.fpga_flag).supports_filter {
            return Err(EmulatorError::NotSupported);
        }
        let dst = if header.data[BODY_TARGET_OFFSET] == BODY_TARGET_DUTY_FILTER {
            &mut self.fpga.duty_filters
        } else {
            &mut self.fpga.phase_filters
        };
        dst.iter_mut()
            .zip(body.iter())
            .for_each(|(d, &v)| *d = v as i16);
        Ok(())
    }
}
