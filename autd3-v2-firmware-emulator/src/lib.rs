pub mod cpu;
pub mod error;
pub mod fpga;
mod link;

pub use cpu::emulator::CPUEmulator;
pub use error::EmulatorError;
pub use fpga::emulator::FPGAEmulator;
pub use link::Emulator;
