use autd3_v2_driver::{
    cpu::{CPUControlFlags, GlobalHeader},
    fpga::{FPGAControlFlags, LegacyDrive},
};

use crate::CPUEmulator;

/// Expands a legacy drive to `(duty, phase)` on the legacy cycle of 4096.
pub(super) const fn decode_legacy(duty: u8, phase: u8) -> (u16, u16) {
    ((duty as u16) << 3, (phase as u16) << 4)
}

impl CPUEmulator {
    pub(crate) fn write_gain(&mut self, header: &GlobalHeader, body: &[u16]) {
        let drives = self.fpga.drives.iter_mut().zip(body.iter());
        if header.fpga_flag.contains(FPGAControlFlags::LEGACY_MODE) {
            drives.for_each(|(d, &w)| {
                let l = LegacyDrive::from_word(w);
                *d = decode_legacy(l.duty, l.phase);
            });
        } else if header.cpu_flag.contains(CPUControlFlags::IS_DUTY) {
            drives.for_each(|(d, &w)| d.0 = w);
        } else {
            drives.for_each(|(d, &w)| d.1 = w);
        }
    }
}
