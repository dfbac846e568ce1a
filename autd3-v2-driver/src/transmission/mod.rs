mod sender;
mod sleep;

pub use sender::{Sender, SenderOption};
pub use sleep::{Sleep, SpinSleeper, StdSleeper};
