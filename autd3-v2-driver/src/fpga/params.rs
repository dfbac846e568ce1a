pub const FPGA_CLK_FREQ: u32 = 163_840_000;

pub const DEFAULT_CYCLE: u16 = 4096;
pub const CYCLE_MAX: u16 = 8191;
pub const LEGACY_CYCLE: u16 = 4096;

pub const MOD_SAMPLING_FREQ_DIV_DEFAULT: u32 = 40960;

pub const SILENCER_CYCLE_DEFAULT: u16 = 4096;
pub const SILENCER_STEP_DEFAULT: u16 = 10;

/// Unit of the fixed point representation of focus coordinates in mm.
pub const FOCUS_STM_FIXED_NUM_UNIT: f64 = 0.025;
pub const FOCUS_STM_FIXED_NUM_UPPER: i32 = (1 << 17) - 1;
pub const FOCUS_STM_FIXED_NUM_LOWER: i32 = -(1 << 17);
pub const FOCUS_STM_DUTY_SHIFT_MAX: u8 = 15;
