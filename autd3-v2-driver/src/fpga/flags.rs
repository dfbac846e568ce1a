use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Device-facing control flags carried in the second header byte.
///
/// The firmware latches this byte into the FPGA control register on every
/// ordinary frame, so bits persist in the host frame buffer across commands.
#[derive(Clone, Copy, PartialEq, Eq, Default, IntoBytes, FromBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FPGAControlFlags(u8);

bitflags::bitflags! {
    impl FPGAControlFlags : u8 {
        const NONE            = 0;
        const LEGACY_MODE     = 1 << 0;
        const USE_FINISH_IDX  = 1 << 2;
        const USE_START_IDX   = 1 << 3;
        const FORCE_FAN       = 1 << 4;
        const STM_MODE        = 1 << 5;
        const STM_GAIN_MODE   = 1 << 6;
        const READS_FPGA_INFO = 1 << 7;
    }
}

impl FPGAControlFlags {
    /// Bits describing the output mode. Owned by the drive and STM operations.
    pub const MODE_BITS: Self = Self::LEGACY_MODE
        .union(Self::USE_FINISH_IDX)
        .union(Self::USE_START_IDX)
        .union(Self::STM_MODE)
        .union(Self::STM_GAIN_MODE);
}

impl fmt::Display for FPGAControlFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self
            .iter_names()
            .filter(|(name, _)| *name != "NONE")
            .map(|(name, _)| name)
            .collect::<Vec<_>>();
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join(" | "))
        }
    }
}

impl fmt::Debug for FPGAControlFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
