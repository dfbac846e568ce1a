/// Size of the modulation memory in samples.
pub const MOD_BUF_SIZE_MAX: usize = 65536;
/// Number of samples played after power-on or clear.
pub const MOD_CYCLE_DEFAULT: usize = 2;

/// Size of the focus STM memory in foci.
pub const FOCUS_STM_BUF_SIZE_MAX: usize = 65536;
/// Size of the gain STM memory in gains.
pub const GAIN_STM_BUF_SIZE_MAX: usize = 2048;

pub const NANOS_PER_SEC: u128 = 1_000_000_000;
