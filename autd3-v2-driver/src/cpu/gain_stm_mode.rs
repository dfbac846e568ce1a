/// How a gain STM packs each drive table into frames.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainSTMMode {
    PhaseDutyFull = 0x0001,
    PhaseFull = 0x0002,
    PhaseHalf = 0x0004,
}

impl GainSTMMode {
    pub const fn from_u16(v: u16) -> Option<Self> {
        match v {
            0x0001 => Some(Self::PhaseDutyFull),
            0x0002 => Some(Self::PhaseFull),
            0x0004 => Some(Self::PhaseHalf),
            _ => None,
        }
    }
}
