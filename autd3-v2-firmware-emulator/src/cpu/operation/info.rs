use autd3_v2_driver::{
    cpu::{
        MSG_RD_CPU_VERSION, MSG_RD_CPU_VERSION_MINOR, MSG_RD_FPGA_FUNCTION, MSG_RD_FPGA_VERSION,
        MSG_RD_FPGA_VERSION_MINOR,
    },
    firmware::version::FPGAVersion,
};

use crate::{cpu::params::*, CPUEmulator};

impl CPUEmulator {
    pub(crate) const fn is_info_msg(msg_id: u8) -> bool {
        matches!(
            msg_id,
            MSG_RD_CPU_VERSION
                | MSG_RD_CPU_VERSION_MINOR
                | MSG_RD_FPGA_VERSION
                | MSG_RD_FPGA_VERSION_MINOR
                | MSG_RD_FPGA_FUNCTION
        )
    }

    pub(crate) const fn firmware_info(&self, msg_id: u8) -> u8 {
        match msg_id {
            MSG_RD_CPU_VERSION | MSG_RD_FPGA_VERSION => self.revision.version_num(),
            MSG_RD_CPU_VERSION_MINOR => CPU_VERSION_MINOR,
            MSG_RD_FPGA_VERSION_MINOR => FPGA_VERSION_MINOR,
            MSG_RD_FPGA_FUNCTION => FPGAVersion::ENABLED_EMULATOR_BIT,
            _ => NO_ERR,
        }
    }
}
