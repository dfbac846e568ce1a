use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Host-facing control flags carried in the third header byte.
///
/// `MOD_BEGIN`/`MOD_END` are only meaningful when `MOD` is set, and
/// `CONFIG_SILENCER`/`CONFIG_SYNC` only when it is clear.
#[derive(Clone, Copy, PartialEq, Eq, Default, IntoBytes, FromBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct CPUControlFlags(u8);

bitflags::bitflags! {
    impl CPUControlFlags : u8 {
        const NONE            = 0;
        const MOD             = 1 << 0;
        const MOD_BEGIN       = 1 << 1;
        const MOD_END         = 1 << 2;
        const CONFIG_EN_N     = 1 << 0;
        const CONFIG_SILENCER = 1 << 1;
        const CONFIG_SYNC     = 1 << 2;
        const WRITE_BODY      = 1 << 3;
        const STM_BEGIN       = 1 << 4;
        const STM_END         = 1 << 5;
        const IS_DUTY         = 1 << 6;
        const MOD_DELAY       = 1 << 7;
    }
}

impl fmt::Display for CPUControlFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_mod = self.contains(Self::MOD);
        let flags = [
            (is_mod, "MOD"),
            (is_mod && self.contains(Self::MOD_BEGIN), "MOD_BEGIN"),
            (is_mod && self.contains(Self::MOD_END), "MOD_END"),
            (!is_mod && self.contains(Self::CONFIG_SILENCER), "CONFIG_SILENCER"),
            (!is_mod && self.contains(Self::CONFIG_SYNC), "CONFIG_SYNC"),
            (self.contains(Self::WRITE_BODY), "WRITE_BODY"),
            (self.contains(Self::STM_BEGIN), "STM_BEGIN"),
            (self.contains(Self::STM_END), "STM_END"),
            (self.contains(Self::IS_DUTY), "IS_DUTY"),
            (self.contains(Self::MOD_DELAY), "MOD_DELAY"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect::<Vec<_>>();
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join(" | "))
        }
    }
}

impl fmt::Debug for CPUControlFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
