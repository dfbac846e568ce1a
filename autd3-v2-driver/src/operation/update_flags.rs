use crate::{
    cpu::TxDatagram, error::AUTDInternalError, fpga::FPGAControlFlags, geometry::Geometry,
};

use super::Operation;
use derive_new::new;

/// Header-only frame that updates the fan and FPGA-info request bits.
///
/// Both bits persist in the frame header, so every following frame carries them.
#[derive(new)]
pub struct UpdateFlagsOp {
    force_fan: bool,
    reads_fpga_info: bool,
    #[new(default)]
    sent: bool,
}

impl Operation for UpdateFlagsOp {
    fn init(&mut self, _: &Geometry) -> Result<(), AUTDInternalError> {
        self.sent = false;
        Ok(())
    }

    fn pack(&mut self, _: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        let header = tx.header_mut();
        header
            .fpga_flag
            .set(FPGAControlFlags::FORCE_FAN, self.force_fan);
        header
            .fpga_flag
            .set(FPGAControlFlags::READS_FPGA_INFO, self.reads_fpga_info);
        tx.set_num_bodies(0);
        self.sent = true;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent
    }
}
