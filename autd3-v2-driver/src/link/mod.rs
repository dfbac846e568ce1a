use crate::{
    cpu::{RxDatagram, TxDatagram},
    error::AUTDInternalError,
    geometry::Geometry,
};

/// Transport carrying frames to the devices and acknowledgements back.
///
/// Frames are delivered to every device in the order they are sent.
pub trait Link: Send {
    /// Opens the link for the devices described by `geometry`.
    fn open(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError>;
    /// Closes the link.
    fn close(&mut self) -> Result<(), AUTDInternalError>;
    /// Sends a frame. Returns `false` if the frame could not be handed over.
    fn send(&mut self, tx: &TxDatagram) -> Result<bool, AUTDInternalError>;
    /// Receives the latest acknowledgement of every device.
    fn receive(&mut self, rx: &mut RxDatagram) -> Result<bool, AUTDInternalError>;
    /// Checks if the link is open.
    #[must_use]
    fn is_open(&self) -> bool;
}

impl Link for Box<dyn Link> {
    fn open(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        self.as_mut().open(geometry)
    }

    fn close(&mut self) -> Result<(), AUTDInternalError> {
        self.as_mut().close()
    }

    fn send(&mut self, tx: &TxDatagram) -> Result<bool, AUTDInternalError> {
        self.as_mut().send(tx)
    }

    fn receive(&mut self, rx: &mut RxDatagram) -> Result<bool, AUTDInternalError> {
        self.as_mut().receive(rx)
    }

    fn is_open(&self) -> bool {
        self.as_ref().is_open()
    }
}
