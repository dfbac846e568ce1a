use std::time::Duration;

use time::OffsetDateTime;

use crate::error::AUTDInternalError;

use super::ECAT_DC_SYS_TIME_BASE;

/// EtherCAT distributed-clock system time, in nanoseconds since 2000-01-01 00:00 UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DcSysTime {
    dc_sys_time: u64,
}

impl DcSysTime {
    pub const ZERO: Self = Self { dc_sys_time: 0 };

    pub const fn from_nanos(nanos: u64) -> Self {
        Self { dc_sys_time: nanos }
    }

    pub const fn sys_time(&self) -> u64 {
        self.dc_sys_time
    }

    pub fn to_utc(&self) -> OffsetDateTime {
        ECAT_DC_SYS_TIME_BASE + Duration::from_nanos(self.dc_sys_time)
    }

    pub fn from_utc(utc: OffsetDateTime) -> Result<Self, AUTDInternalError> {
        match (utc - ECAT_DC_SYS_TIME_BASE).whole_nanoseconds() {
            i if i < 0 => Err(AUTDInternalError::InvalidDateTime),
            i => Ok(Self {
                dc_sys_time: i as u64,
            }),
        }
    }

    pub fn now() -> Self {
        Self::from_utc(OffsetDateTime::now_utc()).unwrap_or(Self::ZERO)
    }

    /// Elapsed time since `earlier`, saturating at zero.
    pub const fn duration_since(&self, earlier: DcSysTime) -> Duration {
        Duration::from_nanos(self.dc_sys_time.saturating_sub(earlier.dc_sys_time))
    }
}

impl std::ops::Add<Duration> for DcSysTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            dc_sys_time: self.dc_sys_time + rhs.as_nanos() as u64,
        }
    }
}

impl std::ops::Sub<Duration> for DcSysTime {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self {
            dc_sys_time: self.dc_sys_time - rhs.as_nanos() as u64,
        }
    }
}
