mod rx;
mod tx;

pub use rx::*;
pub use tx::*;
