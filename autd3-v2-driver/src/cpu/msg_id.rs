pub const MSG_CLEAR: u8 = 0x00;
pub const MSG_RD_CPU_VERSION: u8 = 0x01;
pub const MSG_RD_CPU_VERSION_MINOR: u8 = 0x02;
pub const MSG_RD_FPGA_VERSION: u8 = 0x03;
pub const MSG_RD_FPGA_FUNCTION: u8 = 0x04;
pub const MSG_BEGIN: u8 = 0x05;
pub const MSG_END: u8 = 0xF0;
pub const MSG_RD_FPGA_VERSION_MINOR: u8 = 0xF1;
/// Echoed by a device that has not processed any frame. Never sent.
pub const MSG_NONE: u8 = 0xFF;

/// Message id for ordinary frames. Cycles through `MSG_BEGIN..=MSG_END`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MsgId(u8);

impl MsgId {
    pub const fn new() -> Self {
        Self(MSG_BEGIN)
    }

    pub const fn get(&self) -> u8 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 = if self.0 >= MSG_END {
            MSG_BEGIN
        } else {
            self.0 + 1
        };
    }
}

impl Default for MsgId {
    fn default() -> Self {
        Self::new()
    }
}
