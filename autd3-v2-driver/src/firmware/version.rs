use std::fmt;

use derive_more::{Debug, Display};

use super::FirmwareRevision;

/// Major version byte as reported by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{:#04X}", _0)]
pub struct Major(pub u8);

/// Minor version byte as reported by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub struct Minor(pub u8);

impl Major {
    const V2_SERIES: std::ops::RangeInclusive<u8> = 0x80..=0x8F;

    pub const fn revision(&self) -> Option<FirmwareRevision> {
        FirmwareRevision::from_version_num(self.0)
    }
}

fn write_version(f: &mut fmt::Formatter<'_>, major: Major, minor: Minor) -> fmt::Result {
    match major.revision() {
        Some(rev) => write!(f, "{}.{}", rev, minor),
        None if Major::V2_SERIES.contains(&major.0) => {
            write!(f, "v2.{}.{} (unsupported)", major.0 - 0x80, minor)
        }
        None => write!(f, "unknown ({})", major),
    }
}

/// FPGA firmware version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FPGAVersion {
    pub major: Major,
    pub minor: Minor,
    pub function_bits: u8,
}

impl FPGAVersion {
    /// Set in `function_bits` by the firmware emulator.
    pub const ENABLED_EMULATOR_BIT: u8 = 1 << 7;

    pub const fn is_emulator(&self) -> bool {
        self.function_bits & Self::ENABLED_EMULATOR_BIT != 0
    }
}

impl fmt::Display for FPGAVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_version(f, self.major, self.minor)?;
        if self.is_emulator() {
            write!(f, " [Emulator]")?;
        }
        Ok(())
    }
}

/// CPU firmware version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CPUVersion {
    pub major: Major,
    pub minor: Minor,
}

impl fmt::Display for CPUVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_version(f, self.major, self.minor)
    }
}

/// Firmware information of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{}: CPU = {}, FPGA = {}", idx, self.cpu, self.fpga)]
#[debug("{}", self)]
pub struct FirmwareInfo {
    pub idx: usize,
    pub cpu: CPUVersion,
    pub fpga: FPGAVersion,
}

impl FirmwareInfo {
    pub const fn is_emulator(&self) -> bool {
        self.fpga.is_emulator()
    }

    /// Revision of the CPU firmware, if it is one this crate can drive.
    pub const fn revision(&self) -> Option<FirmwareRevision> {
        self.cpu.major.revision()
    }

    /// Whether the CPU and FPGA firmware report the same major version.
    pub const fn is_matched(&self) -> bool {
        self.cpu.major.0 == self.fpga.major.0
    }
}
