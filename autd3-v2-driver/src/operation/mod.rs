mod clear;
mod filter;
mod gain;
mod info;
mod mod_delay;
mod modulation;
mod silencer;
pub mod stm;
mod sync;
mod update_flags;

pub use clear::*;
pub use filter::*;
pub use gain::*;
pub use info::*;
pub use mod_delay::*;
pub use modulation::*;
pub use silencer::*;
pub use stm::*;
pub use sync::*;
pub use update_flags::*;

use crate::{
    cpu::{CPUControlFlags, MsgId, TxDatagram},
    error::AUTDInternalError,
    geometry::Geometry,
};

/// A logical command turned into a sequence of frames.
///
/// `init` resets the operation to its first frame and validates the payload.
/// `pack` writes the next frame; it is called once per communication cycle until
/// `is_finished` returns `true`. An operation that fails validation leaves the
/// frame bodies untouched.
pub trait Operation: Send {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError>;
    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError>;
    fn is_finished(&self) -> bool;
}

impl Operation for Box<dyn Operation> {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        self.as_mut().init(geometry)
    }

    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        self.as_mut().pack(geometry, tx)
    }

    fn is_finished(&self) -> bool {
        self.as_ref().is_finished()
    }
}

pub struct OperationHandler {}

impl OperationHandler {
    pub fn init(op: &mut impl Operation, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        op.init(geometry)
    }

    pub fn is_finished(op: &impl Operation) -> bool {
        op.is_finished()
    }

    /// Prepares the frame for the next cycle and lets `op` fill it.
    ///
    /// The FPGA flag byte is carried over from the previous frame. If `op` fails,
    /// the header and the number of bodies are restored.
    pub fn pack(
        op: &mut impl Operation,
        geometry: &Geometry,
        tx: &mut TxDatagram,
        msg_id: MsgId,
    ) -> Result<(), AUTDInternalError> {
        if op.is_finished() {
            return Ok(());
        }

        let saved_header = tx.header().clone();
        let saved_num_bodies = tx.num_bodies();

        let header = tx.header_mut();
        header.msg_id = msg_id.get();
        header.cpu_flag = CPUControlFlags::NONE;
        header.size = 0;
        tx.set_num_bodies(0);

        if let Err(e) = op.pack(geometry, tx) {
            *tx.header_mut() = saved_header;
            tx.set_num_bodies(saved_num_bodies);
            return Err(e);
        }

        tracing::trace!(
            "packed frame: msg_id = {:#04X}, fpga_flag = {}, cpu_flag = {}, size = {}, num_bodies = {}",
            tx.header().msg_id,
            tx.header().fpga_flag,
            tx.header().cpu_flag,
            tx.header().size,
            tx.num_bodies()
        );

        Ok(())
    }
}
