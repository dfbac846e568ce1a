mod consts;
mod dc_sys_time;

pub use consts::*;
pub use dc_sys_time::DcSysTime;
