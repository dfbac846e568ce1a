use crate::{
    cpu::{TxDatagram, BODY_TARGET_DUTY_FILTER, BODY_TARGET_PHASE_FILTER},
    error::AUTDInternalError,
    geometry::Geometry,
};

use super::{
    mod_delay::{validate_table_size, write_transducer_table},
    Operation,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterTarget {
    Duty,
    Phase,
}

impl FilterTarget {
    const fn body_target(&self) -> u8 {
        match self {
            FilterTarget::Duty => BODY_TARGET_DUTY_FILTER,
            FilterTarget::Phase => BODY_TARGET_PHASE_FILTER,
        }
    }
}

/// Loads a per-transducer offset added to the duty or phase by the FPGA.
pub struct FilterOp {
    target: FilterTarget,
    offsets: Vec<i16>,
    sent: bool,
}

impl FilterOp {
    pub const fn duty(offsets: Vec<i16>) -> Self {
        Self {
            target: FilterTarget::Duty,
            offsets,
            sent: false,
        }
    }

    pub const fn phase(offsets: Vec<i16>) -> Self {
        Self {
            target: FilterTarget::Phase,
            offsets,
            sent: false,
        }
    }

    pub const fn target(&self) -> FilterTarget {
        self.target
    }

    fn validate(&self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        if !geometry.limits().supports_filter {
            return Err(AUTDInternalError::NotSupported(
                match self.target {
                    FilterTarget::Duty => "Duty filter",
                    FilterTarget::Phase => "Phase filter",
                },
                geometry.revision(),
            ));
        }
        validate_table_size(geometry, self.offsets.len())
    }
}

impl Operation for FilterOp {
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
            self.target.body_target(),
            self.offsets.iter().map(|&v| v as u16),
        )?;
        self.sent = true;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sent
    }
}
