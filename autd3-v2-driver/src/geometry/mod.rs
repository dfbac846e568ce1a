mod device;

pub type Vector3 = nalgebra::Vector3<f64>;

pub use device::*;

use std::ops::{Deref, DerefMut};

use getset::CopyGetters;

use crate::{
    defined::DEFAULT_SOUND_SPEED,
    firmware::{limits_for, FirmwareRevision, Limits, Mode},
};

/// Session description: the device map and the firmware policy in force.
///
/// The number of devices and the number of transducers in each device never
/// change after construction. Per-transducer cycles may be edited.
#[derive(Debug, Clone, CopyGetters)]
pub struct Geometry {
    devices: Vec<Device>,
    #[getset(get_copy = "pub")]
    mode: Mode,
    #[getset(get_copy = "pub")]
    limits: &'static Limits,
    /// Speed of sound in m/s
    #[getset(get_copy = "pub")]
    sound_speed: f64,
}

impl Geometry {
    pub fn new(device_map: &[usize], mode: Mode, revision: FirmwareRevision) -> Self {
        Self {
            devices: device_map
                .iter()
                .enumerate()
                .map(|(idx, &n)| Device::new(idx, n))
                .collect(),
            mode,
            limits: limits_for(mode, revision),
            sound_speed: DEFAULT_SOUND_SPEED,
        }
    }

    pub fn with_sound_speed(mut self, c: f64) -> Self {
        self.sound_speed = c;
        self
    }

    pub fn set_sound_speed(&mut self, c: f64) {
        self.sound_speed = c;
    }

    /// Set speed of sound from temperature in Celsius
    pub fn set_sound_speed_from_temp(&mut self, temp: f64) {
        self.set_sound_speed_from_temp_with(temp, 1.4, 8.314_463, 28.9647e-3);
    }

    pub fn set_sound_speed_from_temp_with(&mut self, temp: f64, k: f64, r: f64, m: f64) {
        self.sound_speed = (k * r * (273.15 + temp) / m).sqrt();
    }

    pub const fn revision(&self) -> FirmwareRevision {
        self.limits.revision
    }

    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    pub fn num_transducers(&self) -> usize {
        self.devices.iter().map(Device::num_transducers).sum()
    }

    /// Number of transducers of each device.
    pub fn device_map(&self) -> Vec<usize> {
        self.devices.iter().map(Device::num_transducers).collect()
    }

    /// Cycles of all transducers, device by device.
    pub fn cycles(&self) -> impl Iterator<Item = u16> + '_ {
        self.devices.iter().flat_map(|dev| dev.cycles().iter().copied())
    }
}

impl Deref for Geometry {
    type Target = [Device];

    fn deref(&self) -> &Self::Target {
        &self.devices
    }
}

impl DerefMut for Geometry {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.devices
    }
}

impl<'a> IntoIterator for &'a Geometry {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}
