use autd3_v2_driver::{
    cpu::GlobalHeader,
    fpga::{FPGAControlFlags, CYCLE_MAX, LEGACY_CYCLE},
};

use crate::{error::EmulatorError, CPUEmulator};

impl CPUEmulator {
    pub(crate) fn synchronize(
        &mut self,
        header: &GlobalHeader,
        body: &[u16],
    ) -> Result<(), EmulatorError> {
        let legacy = header.fpga_flag.contains(FPGAControlFlags::LEGACY_MODE);
        let cycles = &body[..self.num_transducers];
        if let Some(&cycle) = cycles
            .iter()
            .find(|&&c| !(1..=CYCLE_MAX).contains(&c) || (legacy && c != LEGACY_CYCLE))
        {
            return Err(EmulatorError::InvalidSyncCycle(cycle));
        }

        self.fpga.cycles.copy_from_slice(cycles);
        self.fpga.reset_output();
        self.synchronized = true;
        Ok(())
    }
}
