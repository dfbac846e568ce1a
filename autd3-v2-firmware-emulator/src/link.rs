use autd3_v2_driver::{
    cpu::{RxDatagram, TxDatagram},
    error::AUTDInternalError,
    ethercat::DcSysTime,
    firmware::FirmwareRevision,
    geometry::Geometry,
    link::Link,
};

use crate::{CPUEmulator, FPGAEmulator};

/// [`Link`] delivering every frame to an in-process [`CPUEmulator`] per device.
///
/// The emulated clocks follow the host clock; each receive advances them to
/// [`DcSysTime::now`].
#[derive(Default)]
pub struct Emulator {
    cpus: Vec<CPUEmulator>,
    is_open: bool,
    revision: Option<FirmwareRevision>,
    broken: bool,
}

impl std::ops::Deref for Emulator {
    type Target = [CPUEmulator];

    fn deref(&self) -> &Self::Target {
        &self.cpus
    }
}

impl std::ops::DerefMut for Emulator {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cpus
    }
}

impl Emulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulates firmware of `revision` regardless of the revision in the geometry.
    pub fn with_revision(revision: FirmwareRevision) -> Self {
        Self {
            revision: Some(revision),
            ..Self::default()
        }
    }

    pub fn emulators(&self) -> impl Iterator<Item = &FPGAEmulator> {
        self.cpus.iter().map(CPUEmulator::fpga)
    }

    pub fn emulators_mut(&mut self) -> impl Iterator<Item = &mut FPGAEmulator> {
        self.cpus.iter_mut().map(CPUEmulator::fpga_mut)
    }

    /// Makes every following send and receive fail.
    pub fn break_down(&mut self) {
        self.broken = true;
    }

    pub fn repair(&mut self) {
        self.broken = false;
    }

    fn check(&self) -> Result<(), AUTDInternalError> {
        if !self.is_open {
            return Err(AUTDInternalError::LinkClosed);
        }
        if self.broken {
            return Err(AUTDInternalError::LinkError("broken".to_owned()));
        }
        Ok(())
    }
}

impl Link for Emulator {
    fn open(&mut self, geometry: &Geometry) -> Result<(), AUTDInternalError> {
        let revision = self.revision.unwrap_or(geometry.revision());
        self.cpus = geometry
            .device_map()
            .into_iter()
            .enumerate()
            .map(|(i, n)| CPUEmulator::new(i, n, revision))
            .collect();
        self.is_open = true;
        tracing::debug!(
            "emulator opened: {} device(s), firmware {:?}",
            self.cpus.len(),
            revision
        );
        Ok(())
    }

    fn close(&mut self) -> Result<(), AUTDInternalError> {
        self.is_open = false;
        Ok(())
    }

    fn send(&mut self, tx: &TxDatagram) -> Result<bool, AUTDInternalError> {
        self.check()?;
        self.cpus.iter_mut().for_each(|cpu| {
            // The error is reported to the host through the ack.
            let _ = cpu.send(tx);
        });
        Ok(true)
    }

    fn receive(&mut self, rx: &mut RxDatagram) -> Result<bool, AUTDInternalError> {
        self.check()?;
        let now = DcSysTime::now();
        self.cpus.iter_mut().zip(rx.iter_mut()).for_each(|(cpu, r)| {
            cpu.update_with_sys_time(now);
            *r = cpu.rx();
        });
        Ok(true)
    }

    fn is_open(&self) -> bool {
        self.is_open
    }
}
