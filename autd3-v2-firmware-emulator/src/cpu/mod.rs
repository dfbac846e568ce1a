pub mod emulator;
mod operation;
pub mod params;
