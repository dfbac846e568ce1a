mod datagram;
mod flags;
mod gain_stm_mode;
mod header;
mod msg_id;

pub use datagram::*;
pub use flags::CPUControlFlags;
pub use gain_stm_mode::GainSTMMode;
pub use header::*;
pub use msg_id::*;
