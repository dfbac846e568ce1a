use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::fpga::FPGAControlFlags;

use super::CPUControlFlags;

pub const HEADER_SIZE: usize = 128;
pub const HEADER_PAYLOAD_OFFSET: usize = 4;
pub const HEADER_PAYLOAD_SIZE: usize = HEADER_SIZE - HEADER_PAYLOAD_OFFSET;

/// Selects the per-transducer table a `MOD_DELAY` frame writes, stored in `data[0]`.
pub const BODY_TARGET_MOD_DELAY: u8 = 0x00;
pub const BODY_TARGET_DUTY_FILTER: u8 = 0x01;
pub const BODY_TARGET_PHASE_FILTER: u8 = 0x02;

/// Header shared by every device in a frame.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct GlobalHeader {
    pub msg_id: u8,
    pub fpga_flag: FPGAControlFlags,
    pub cpu_flag: CPUControlFlags,
    pub size: u8,
    pub data: [u8; HEADER_PAYLOAD_SIZE],
}

impl GlobalHeader {
    pub const fn new() -> Self {
        Self {
            msg_id: 0,
            fpga_flag: FPGAControlFlags::NONE,
            cpu_flag: CPUControlFlags::NONE,
            size: 0,
            data: [0; HEADER_PAYLOAD_SIZE],
        }
    }

    pub fn read_u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.data[offset], self.data[offset + 1]])
    }

    pub fn read_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    pub fn write_u16(&mut self, offset: usize, value: u16) {
        self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl Default for GlobalHeader {
    fn default() -> Self {
        Self::new()
    }
}
