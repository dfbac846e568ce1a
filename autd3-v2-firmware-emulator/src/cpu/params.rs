pub const NO_ERR: u8 = 0x00;

pub const CPU_VERSION_MINOR: u8 = 0x00;
pub const FPGA_VERSION_MINOR: u8 = 0x00;

// Offsets in the header payload.
pub const MOD_FREQ_DIV_OFFSET: usize = 0;
pub const MOD_HEAD_DATA_OFFSET: usize = 4;
pub const SILENCER_CYCLE_OFFSET: usize = 0;
pub const SILENCER_STEP_OFFSET: usize = 2;
pub const BODY_TARGET_OFFSET: usize = 0;

// Word layout of STM bodies.
pub const FOCUS_STM_SIZE_IDX: usize = 0;
pub const FOCUS_STM_FREQ_DIV_IDX: usize = 1;
pub const FOCUS_STM_SOUND_SPEED_IDX: usize = 3;
pub const FOCUS_STM_START_IDX_IDX: usize = 5;
pub const FOCUS_STM_FINISH_IDX_IDX: usize = 6;
pub const FOCUS_STM_HEAD_WORDS: usize = 7;
pub const FOCUS_STM_BODY_WORDS: usize = 1;
pub const FOCUS_WORDS: usize = 4;

pub const GAIN_STM_FREQ_DIV_IDX: usize = 0;
pub const GAIN_STM_MODE_IDX: usize = 2;
pub const GAIN_STM_SIZE_IDX: usize = 3;
pub const GAIN_STM_START_IDX_IDX: usize = 4;
pub const GAIN_STM_FINISH_IDX_IDX: usize = 5;
pub const GAIN_STM_HEAD_WORDS: usize = 6;

/// Legacy duty byte `0xFF` as written for gains that carry phase only.
pub const LEGACY_DUTY_FULL: u8 = 0xFF;
