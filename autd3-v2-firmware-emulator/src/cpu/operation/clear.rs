use autd3_v2_driver::cpu::GlobalHeader;

use crate::CPUEmulator;

impl CPUEmulator {
    pub(crate) fn clear(&mut self, header: &GlobalHeader) {
        self.fpga.init();
        self.mod_write = None;
        self.stm_write = None;
        self.fpga.flags = header.fpga_flag;
    }
}
