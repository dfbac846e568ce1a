use crate::{
    cpu::{TxDatagram, MSG_CLEAR},
    error::AUTDInternalError,
    fpga::FPGAControlFlags,
    geometry::Geometry,
};

use super::Operation;

/// Resets every device to its power-on state.
#[derive(Default)]
pub struct ClearOp {
    sent: bool,
}

impl ClearOp {
    pub const fn new() -> Self {
        Self { sent: false }
    }
}

impl Operation for ClearOp {
    fn init(&mut self, _: &Geometry) -> Result<(), AUTDInternalError> {
        self.sent = false;
        Ok(())
    }

    fn pack(&mut self, _: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        let header = tx.header_mut();
        header.msg_id = MSG_CLEAR;
        header.fpga_flag.remove(FPGAControlFlags::MODE_BITS);
        tx.set_num_bodies(0);

        self.sent = true;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent
    }
}
