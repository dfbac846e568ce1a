use autd3_v2_driver::cpu::GlobalHeader;

use crate::{cpu::params::*, error::EmulatorError, CPUEmulator};

impl CPUEmulator {
    pub(crate) fn config_silencer(&mut self, header: &GlobalHeader) -> Result<(), EmulatorError> {
        let limits = self.limits(header.fpga_flag);
        let cycle = header.read_u16(SILENCER_CYCLE_OFFSET);
        let step = header.read_u16(SILENCER_STEP_OFFSET);

        if cycle < limits.silencer_cycle_min {
            return Err(EmulatorError::SilencerCycleTooSmall(cycle));
        }
        if step < limits.silencer_step_min {
            return Err(EmulatorError::SilencerStepTooSmall(step));
        }

        self.fpga.silencer_cycle = cycle;
        self.fpga.silencer_step = step;
        Ok(())
    }
}
