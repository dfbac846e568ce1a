use crate::{
    cpu::{CPUControlFlags, TxDatagram, BODY_TARGET_MOD_DELAY},
    error::AUTDInternalError,
    geometry::Geometry,
};

use super::Operation;
use derive_new::new;

/// Writes a per-transducer table selected by `target` into all bodies.
pub(super) fn write_transducer_table(
    geometry: &Geometry,
    tx: &mut TxDatagram,
    target: u8,
    table: impl IntoIterator<Item = u16>,
) -> Result<(), AUTDInternalError> {
    let mut table = table.into_iter();
    geometry.iter().for_each(|dev| {
        tx.body_mut(dev.idx())
            .iter_mut()
            .zip(table.by_ref())
            .for_each(|(d, v)| *d = v);
    });

    let header = tx.header_mut();
    header
        .cpu_flag
        .set(CPUControlFlags::WRITE_BODY | CPUControlFlags::MOD_DELAY, true);
    header.data[0] = target;
    tx.write_all_bodies();
    Ok(())
}

pub(super) fn validate_table_size(
    geometry: &Geometry,
    len: usize,
) -> Result<(), AUTDInternalError> {
    if len != geometry.num_transducers() {
        return Err(AUTDInternalError::TableSizeMismatch(
            len,
            geometry.num_transducers(),
        ));
    }
    Ok(())
}

/// Delays the modulation index seen by each transducer.
///
/// Each transducer plays the modulation sample `delay` entries behind the
/// device-wide index.
///
/// `delays` holds one value per transducer, device by device.
#[derive(new)]
pub struct ModDelayOp {
    delays: Vec<u16>,
    #[new(default)]
    sent: bool,
}

impl ModDelayOp {
    fn validate(&self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        if !geometry.limits().supports_mod_delay {
            return Err(AUTDInternalError::NotSupported(
                "Modulation delay",
                geometry.revision(),
            ));
        }
        validate_table_size(geometry, self.delays.len())
    }
}

impl Operation for ModDelayOp {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        self.validate(geometry)?;
        self.sent = false;
        Ok(())
    }

    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        self.validate(geometry)?;
        write_transducer_table(
            geometry,
            tx,
            BODY_TARGET_MOD_DELAY,
            self.delays.iter().copied(),
        )?;
        self.sent = true;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent
    }
}
