use crate::{
    cpu::{CPUControlFlags, TxDatagram},
    error::AUTDInternalError,
    fpga::{SILENCER_CYCLE_DEFAULT, SILENCER_STEP_DEFAULT},
    geometry::Geometry,
};

use super::Operation;

/// Configures the silencer, a low-pass filter limiting how fast each output may change.
///
/// The output moves by at most `step` every `cycle` FPGA clocks.
pub struct SilencerOp {
    cycle: u16,
    step: u16,
    sent: bool,
}

impl SilencerOp {
    pub const fn new(cycle: u16, step: u16) -> Self {
        Self {
            cycle,
            step,
            sent: false,
        }
    }

    fn validate(&self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        let limits = geometry.limits();
        if self.cycle < limits.silencer_cycle_min {
            return Err(AUTDInternalError::SilencerCycleOutOfRange(
                self.cycle,
                limits.silencer_cycle_min,
            ));
        }
        if self.step < limits.silencer_step_min {
            return Err(AUTDInternalError::SilencerStepOutOfRange(
                self.step,
                limits.silencer_step_min,
            ));
        }
        Ok(())
    }
}

impl Default for SilencerOp {
    fn default() -> Self {
        Self::new(SILENCER_CYCLE_DEFAULT, SILENCER_STEP_DEFAULT)
    }
}

impl Operation for SilencerOp {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        self.validate(geometry)?;
        self.sent = false;
        Ok(())
    }

    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        self.validate(geometry)?;

        let header = tx.header_mut();
        header.cpu_flag.set(CPUControlFlags::CONFIG_SILENCER, true);
        header.write_u16(0, self.cycle);
        header.write_u16(2, self.step);

        self.sent = true;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent
    }
}
