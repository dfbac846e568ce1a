use thiserror::Error;

use crate::{cpu::GainSTMMode, firmware::FirmwareRevision};

/// A interface for error handling in autd3-v2-driver.
#[derive(Error, Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum AUTDInternalError {
    /// Modulation buffer size is out of range.
    #[error("Modulation buffer size ({0}) is out of range ([{1}, {2}])")]
    ModulationSizeOutOfRange(usize, usize, usize),
    /// Modulation sampling frequency division is too small.
    #[error("Modulation sampling frequency division ({0}) must be at least {1}")]
    ModFreqDivOutOfRange(u32, u32),

    /// Silencer cycle is too small.
    #[error("Silencer cycle ({0}) must be at least {1}")]
    SilencerCycleOutOfRange(u16, u16),
    /// Silencer step is too small.
    #[error("Silencer step ({0}) must be at least {1}")]
    SilencerStepOutOfRange(u16, u16),

    /// Cycle is out of range.
    #[error("Cycle ({0}) is out of range ([1, {max}])", max = crate::fpga::CYCLE_MAX)]
    CycleOutOfRange(u16),
    /// Legacy mode runs every transducer at a fixed cycle.
    #[error("Cycle ({0}) is not allowed in legacy mode, which requires {cycle}", cycle = crate::fpga::LEGACY_CYCLE)]
    LegacyCycleMismatch(u16),
    /// Number of cycles does not match the number of transducers.
    #[error("Number of cycles ({0}) does not match the number of transducers ({1})")]
    CycleNumMismatch(usize, usize),
    /// Number of entries of a per-transducer table does not match the number of transducers.
    #[error("Number of entries ({0}) does not match the number of transducers ({1})")]
    TableSizeMismatch(usize, usize),

    /// FocusSTM buffer size is out of range.
    #[error("FocusSTM size ({0}) is out of range ([{1}, {2}])")]
    FocusSTMPointSizeOutOfRange(usize, usize, usize),
    /// FocusSTM sampling frequency division is too small.
    #[error("FocusSTM sampling frequency division ({0}) must be at least {1}")]
    FocusSTMFreqDivOutOfRange(u32, u32),
    /// FocusSTM point is out of range.
    #[error("Point coordinate ({0}, {1}, {2}) is out of range")]
    FocusSTMPointOutOfRange(f64, f64, f64),
    /// Duty shift is out of range.
    #[error("Duty shift ({0}) is out of range ([0, {max}])", max = crate::fpga::FOCUS_STM_DUTY_SHIFT_MAX)]
    DutyShiftOutOfRange(u8),
    /// GainSTM buffer size is out of range.
    #[error("GainSTM size ({0}) is out of range ([{1}, {2}])")]
    GainSTMSizeOutOfRange(usize, usize, usize),
    /// GainSTM sampling frequency division is too small.
    #[error("GainSTM sampling frequency division ({0}) must be at least {1}")]
    GainSTMFreqDivOutOfRange(u32, u32),
    /// GainSTM mode is not supported.
    #[error("GainSTMMode ({0:?}) is not supported")]
    GainSTMModeNotSupported(GainSTMMode),
    /// STM start index is out of range.
    #[error("STM start index ({0}) is out of range ([0, {1}))")]
    STMStartIndexOutOfRange(u16, usize),
    /// STM finish index is out of range.
    #[error("STM finish index ({0}) is out of range ([0, {1}))")]
    STMFinishIndexOutOfRange(u16, usize),
    /// A device body is too small to carry the operation.
    #[error("Device {0} has too few transducers ({1}) to carry this operation")]
    DeviceTooSmall(usize, usize),

    /// The feature is not supported by the firmware revision in use.
    #[error("{0} is not supported on firmware {1}")]
    NotSupported(&'static str, FirmwareRevision),

    /// Link is closed.
    #[error("Link is closed")]
    LinkClosed,
    /// Error in the link.
    #[error("{0}")]
    LinkError(String),
    /// Link failed to send a frame.
    #[error("Failed to send data")]
    SendDataFailed,
    /// Failed to confirm the response from the device.
    #[error("Failed to confirm the response from the device")]
    ConfirmResponseFailed,
    /// Failed to read firmware information.
    #[error("Read firmware info failed: {}", .0.iter().enumerate().filter(|(_, &b)| !b).map(|(i, _)| i.to_string()).collect::<Vec<_>>().join(", "))]
    ReadFirmwareInfoFailed(Vec<bool>),
    /// Invalid date time.
    #[error("The input data is invalid.")]
    InvalidDateTime,

    #[error("Invalid message ID")]
    InvalidMessageId,
    #[error("Modulation buffer overflow in device")]
    ModulationBufferOverflow,
    #[error("Modulation sampling frequency division too small in device")]
    ModulationFreqDivTooSmall,
    #[error("STM buffer overflow in device")]
    STMBufferOverflow,
    #[error("STM sampling frequency division too small in device")]
    STMFreqDivTooSmall,
    #[error("Invalid GainSTM mode")]
    InvalidGainSTMMode,
    #[error("Silencer cycle too small in device")]
    SilencerCycleTooSmall,
    #[error("Silencer step too small in device")]
    SilencerStepTooSmall,
    #[error("Invalid body target")]
    InvalidBodyTarget,
    #[error("Stream data received before its begin frame")]
    StreamNotStarted,
    #[error("Invalid synchronization cycle")]
    InvalidSyncCycle,
    #[error("Not supported by device firmware")]
    FirmwareNotSupported,
    #[error("STM start/finish index out of range in device")]
    StartIdxOutOfRange,
    #[error("Unknown firmware error: {0}")]
    UnknownFirmwareError(u8),
}

impl AUTDInternalError {
    pub const fn firmware_err(ack: u8) -> Self {
        match ack {
            0x81 => AUTDInternalError::InvalidMessageId,
            0x82 => AUTDInternalError::ModulationBufferOverflow,
            0x83 => AUTDInternalError::ModulationFreqDivTooSmall,
            0x84 => AUTDInternalError::STMBufferOverflow,
            0x85 => AUTDInternalError::STMFreqDivTooSmall,
            0x86 => AUTDInternalError::InvalidGainSTMMode,
            0x87 => AUTDInternalError::SilencerCycleTooSmall,
            0x88 => AUTDInternalError::SilencerStepTooSmall,
            0x89 => AUTDInternalError::InvalidBodyTarget,
            0x8A => AUTDInternalError::StreamNotStarted,
            0x8B => AUTDInternalError::InvalidSyncCycle,
            0x8C => AUTDInternalError::FirmwareNotSupported,
            0x8D => AUTDInternalError::StartIdxOutOfRange,
            _ => AUTDInternalError::UnknownFirmwareError(ack),
        }
    }
}
