use autd3_v2_driver::error::AUTDInternalError;
use thiserror::Error;

/// Error detected by the emulated firmware while decoding a frame.
///
/// Each variant has a status code which the device reports in `ack`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulatorError {
    #[error("Invalid message ID: {0:#04X}")]
    InvalidMessageId(u8),
    #[error("Modulation buffer overflow")]
    ModulationBufferOverflow,
    #[error("Modulation sampling frequency division ({0}) is too small")]
    ModulationFreqDivTooSmall(u32),
    #[error("STM buffer overflow")]
    STMBufferOverflow,
    #[error("STM sampling frequency division ({0}) is too small")]
    STMFreqDivTooSmall(u32),
    #[error("Invalid GainSTM mode: {0}")]
    InvalidGainSTMMode(u16),
    #[error("Silencer cycle ({0}) is too small")]
    SilencerCycleTooSmall(u16),
    #[error("Silencer step ({0}) is too small")]
    SilencerStepTooSmall(u16),
    #[error("Invalid body target: {0}")]
    InvalidBodyTarget(u8),
    #[error("Stream data received before its begin frame")]
    StreamNotStarted,
    #[error("Invalid synchronization cycle: {0}")]
    InvalidSyncCycle(u16),
    #[error("Not supported by this firmware")]
    NotSupported,
    #[error("STM start/finish index ({0}) out of range")]
    StartIdxOutOfRange(u16),
}

impl EmulatorError {
    /// Status code reported in `ack`.
    pub const fn code(&self) -> u8 {
        0x80 | match self {
            Self::InvalidMessageId(_) => 0x01,
            Self::ModulationBufferOverflow => 0x02,
            Self::ModulationFreqDivTooSmall(_) => 0x03,
            Self::STMBufferOverflow => 0x04,
            Self::STMFreqDivTooSmall(_) => 0x05,
            Self::InvalidGainSTMMode(_) => 0x06,
            Self::SilencerCycleTooSmall(_) => 0x07,
            Self::SilencerStepTooSmall(_) => 0x08,
            Self::InvalidBodyTarget(_) => 0x09,
            Self::StreamNotStarted => 0x0A,
            Self::InvalidSyncCycle(_) => 0x0B,
            Self::NotSupported => 0x0C,
            Self::StartIdxOutOfRange(_) => 0x0D,
        }
    }
}

impl From<EmulatorError> for AUTDInternalError {
    fn from(e: EmulatorError) -> Self {
        AUTDInternalError::firmware_err(e.code())
    }
}
