use autd3_v2_driver::cpu::{
    GlobalHeader, BODY_TARGET_DUTY_FILTER, BODY_TARGET_MOD_DELAY, BODY_TARGET_PHASE_FILTER,
};

use crate::{cpu::params::*, error::EmulatorError, CPUEmulator};

impl CPUEmulator {
    pub(crate) fn write_transducer_table(
        &mut self,
        header: &GlobalHeader,
        body: &[u16],
    ) -> Result<(), EmulatorError> {
        match header.data[BODY_TARGET_OFFSET] {
            BODY_TARGET_MOD_DELAY => self.write_mod_delay(header, body),
            BODY_TARGET_DUTY_FILTER | BODY_TARGET_PHASE_FILTER => self.write_filter(header, body),
            target => Err(EmulatorError::InvalidBodyTarget(target)),
        }
    }

    fn write_mod_delay(
        &mut self,
        header: &GlobalHeader,
        body: &[u16],
    ) -> Result<(), EmulatorError> {
        if !self.limits(header.fpga_flag).supports_mod_delay {
            return Err(EmulatorError::NotSupported);
        }
        self.fpga
            .mod_delays
            .copy_from_slice(&body[..self.num_transducers]);
        Ok(())
    }
}
