/// FPGA status reported in the acknowledgement while reads-FPGA-info is enabled.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FPGAInfo {
    info: u8,
}

impl FPGAInfo {
    pub const THERMAL_ASSERT_BIT: u8 = 1 << 0;

    pub const fn new(info: u8) -> Self {
        Self { info }
    }

    pub const fn is_thermal_assert(&self) -> bool {
        (self.info & Self::THERMAL_ASSERT_BIT) != 0
    }

    pub const fn info(&self) -> u8 {
        self.info
    }
}
