use crate::{
    cpu::{
        TxDatagram, MSG_RD_CPU_VERSION, MSG_RD_CPU_VERSION_MINOR, MSG_RD_FPGA_FUNCTION,
        MSG_RD_FPGA_VERSION, MSG_RD_FPGA_VERSION_MINOR,
    },
    error::AUTDInternalError,
    geometry::Geometry,
};

use super::Operation;
use derive_new::new;

/// Which version byte the devices answer with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirmwareInfoType {
    CPUMajor,
    CPUMinor,
    FPGAMajor,
    FPGAMinor,
    FPGAFunctions,
}

impl FirmwareInfoType {
    pub const fn msg_id(&self) -> u8 {
        match self {
            FirmwareInfoType::CPUMajor => MSG_RD_CPU_VERSION,
            FirmwareInfoType::CPUMinor => MSG_RD_CPU_VERSION_MINOR,
            FirmwareInfoType::FPGAMajor => MSG_RD_FPGA_VERSION,
            FirmwareInfoType::FPGAMinor => MSG_RD_FPGA_VERSION_MINOR,
            FirmwareInfoType::FPGAFunctions => MSG_RD_FPGA_FUNCTION,
        }
    }
}

/// Header-only frame carrying a reserved message id. Devices answer in `ack`.
#[derive(new)]
pub struct FirmwareInfoOp {
    ty: FirmwareInfoType,
    #[new(default)]
    sent: bool,
}

impl Operation for FirmwareInfoOp {
    fn init(&mut self, _: &Geometry) -> Result<(), AUTDInternalError> {
        self.sent = false;
        Ok(())
    }

    fn pack(&mut self, _: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        tx.header_mut().msg_id = self.ty.msg_id();
        tx.set_num_bodies(0);
        self.sent = true;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent
    }
}
