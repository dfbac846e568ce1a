mod drive;
mod flags;
mod fpga_info;
mod params;
mod stm_focus;

pub use drive::*;
pub use flags::FPGAControlFlags;
pub use fpga_info::FPGAInfo;
pub use params::*;
pub use stm_focus::STMFocus;
