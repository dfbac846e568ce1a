use crate::{
    cpu::{CPUControlFlags, TxDatagram},
    error::AUTDInternalError,
    fpga::{FPGAControlFlags, CYCLE_MAX, LEGACY_CYCLE},
    geometry::Geometry,
};

use super::Operation;

/// Synchronizes the devices and loads the drive cycle of every transducer.
pub struct SyncOp {
    cycles: Vec<u16>,
    sent: bool,
}

impl SyncOp {
    /// `cycles` holds one value per transducer, device by device.
    pub const fn new(cycles: Vec<u16>) -> Self {
        Self {
            cycles,
            sent: false,
        }
    }

    /// Uses the cycles currently configured in `geometry`.
    pub fn from_geometry(geometry: &Geometry) -> Self {
        Self::new(geometry.cycles().collect())
    }

    fn validate(&self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        if self.cycles.len() != geometry.num_transducers() {
            return Err(AUTDInternalError::CycleNumMismatch(
                self.cycles.len(),
                geometry.num_transducers(),
            ));
        }
        if let Some(&c) = self.cycles.iter().find(|&&c| !(1..=CYCLE_MAX).contains(&c)) {
            return Err(AUTDInternalError::CycleOutOfRange(c));
        }
        if geometry.mode().is_legacy() {
            if let Some(&c) = self.cycles.iter().find(|&&c| c != LEGACY_CYCLE) {
                return Err(AUTDInternalError::LegacyCycleMismatch(c));
            }
        }
        Ok(())
    }
}

impl Operation for SyncOp {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        self.validate(geometry)?;
        self.sent = false;
        Ok(())
    }

    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        self.validate(geometry)?;

        let mut cycles = self.cycles.iter();
        tx.for_each_body_mut(|_, body| {
            body.iter_mut()
                .zip(cycles.by_ref())
                .for_each(|(d, &c)| *d = c);
        });
        let header = tx.header_mut();
        header
            .fpga_flag
            .set(FPGAControlFlags::LEGACY_MODE, geometry.mode().is_legacy());
        header.cpu_flag.set(CPUControlFlags::CONFIG_SYNC, true);
        tx.write_all_bodies();

        self.sent = true;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent
    }
}
