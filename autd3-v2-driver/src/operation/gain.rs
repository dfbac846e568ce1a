use crate::{
    cpu::{CPUControlFlags, TxDatagram},
    error::AUTDInternalError,
    firmware::Mode,
    fpga::{normal_duty, normal_phase, Drive, FPGAControlFlags, LegacyDrive},
    geometry::Geometry,
};

use super::Operation;

/// Writes one drive per transducer.
///
/// Legacy mode packs phase and duty into one frame. Normal mode sends the phase
/// frame followed by the duty frame, and NormalPhase sends the phase frame only.
pub struct GainOp {
    drives: Vec<Drive>,
    needs_duty: bool,
    phase_sent: bool,
    duty_sent: bool,
}

impl GainOp {
    /// `drives` holds one drive per transducer, device by device.
    pub const fn new(drives: Vec<Drive>) -> Self {
        Self {
            drives,
            needs_duty: false,
            phase_sent: false,
            duty_sent: false,
        }
    }

    pub fn drives(&self) -> &[Drive] {
        &self.drives
    }

    fn pack_legacy(&self, geometry: &Geometry, tx: &mut TxDatagram) {
        let mut drives = self.drives.iter();
        geometry.iter().for_each(|dev| {
            tx.body_mut(dev.idx())
                .iter_mut()
                .zip(drives.by_ref())
                .for_each(|(d, s)| *d = LegacyDrive::from(s).word());
        });
    }

    fn pack_normal(&self, geometry: &Geometry, tx: &mut TxDatagram, duty: bool) {
        let mut drives = self.drives.iter();
        geometry.iter().for_each(|dev| {
            tx.body_mut(dev.idx())
                .iter_mut()
                .zip(dev.cycles())
                .zip(drives.by_ref())
                .for_each(|((d, &cycle), s)| {
                    *d = if duty {
                        normal_duty(s, cycle)
                    } else {
                        normal_phase(s, cycle)
                    }
                });
        });
    }
}

impl Operation for GainOp {
    fn init(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        assert_eq!(
            geometry.num_transducers(),
            self.drives.len(),
            "number of drives must match the number of transducers"
        );
        self.needs_duty = geometry.mode().num_gain_passes() > 1;
        self.phase_sent = false;
        self.duty_sent = false;
        Ok(())
    }

    fn pack(&mut self, geometry: &Geometry, tx: &mut TxDatagram) -> Result<(), AUTDInternalError> {
        let header = tx.header_mut();
        header.fpga_flag.remove(
            FPGAControlFlags::STM_MODE
                | FPGAControlFlags::STM_GAIN_MODE
                | FPGAControlFlags::USE_START_IDX
                | FPGAControlFlags::USE_FINISH_IDX,
        );
        header
            .fpga_flag
            .set(FPGAControlFlags::LEGACY_MODE, geometry.mode().is_legacy());
        header.cpu_flag.set(CPUControlFlags::WRITE_BODY, true);

        match geometry.mode() {
            Mode::Legacy => {
                self.pack_legacy(geometry, tx);
                self.phase_sent = true;
            }
            Mode::Normal | Mode::NormalPhase => {
                if !self.phase_sent {
                    self.pack_normal(geometry, tx, false);
                    self.phase_sent = true;
                } else {
                    tx.header_mut().cpu_flag.set(CPUControlFlags::IS_DUTY, true);
                    self.pack_normal(geometry, tx, true);
                    self.duty_sent = true;
                }
            }
        }
        tx.write_all_bodies();

        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.phase_sent && (!self.needs_duty || self.duty_sent)
    }
}
