use std::ops::{Deref, DerefMut};

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{cpu::MSG_NONE, error::AUTDInternalError};

/// Acknowledgement returned by each device.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout,
)]
pub struct RxMessage {
    pub ack: u8,
    pub msg_id: u8,
}

impl Default for RxMessage {
    fn default() -> Self {
        Self::new(0, MSG_NONE)
    }
}

impl RxMessage {
    pub const fn new(ack: u8, msg_id: u8) -> Self {
        Self { ack, msg_id }
    }

    /// Maps a firmware error code in `ack` to an error.
    ///
    /// Not applicable to frames reading firmware versions, whose `ack` is the version byte.
    pub const fn check(&self) -> Result<(), AUTDInternalError> {
        if self.ack & 0x80 != 0 {
            return Err(AUTDInternalError::firmware_err(self.ack));
        }
        Ok(())
    }
}

/// Acknowledgements of all devices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RxDatagram {
    data: Vec<RxMessage>,
}

impl RxDatagram {
    pub fn new(num_devices: usize) -> Self {
        Self {
            data: vec![RxMessage::default(); num_devices],
        }
    }

    /// Whether every device has echoed `msg_id`.
    pub fn is_msg_processed(&self, msg_id: u8) -> bool {
        self.data.iter().all(|msg| msg.msg_id == msg_id)
    }

    /// Forgets the echoed ids so that an acknowledgement of an earlier frame
    /// with the same id is not taken for the next one.
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|msg| msg.msg_id = MSG_NONE);
    }

    pub fn copy_from(&mut self, src: &[RxMessage]) {
        self.data.copy_from_slice(src);
    }
}

impl Deref for RxDatagram {
    type Target = [RxMessage];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for RxDatagram {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
