use zerocopy::IntoBytes;

use super::super::{GlobalHeader, HEADER_SIZE};

/// One outbound frame: a header shared by all devices followed by one body per device.
///
/// Bodies are stored back to back in a single word arena. Only the first
/// `num_bodies` of them are transmitted.
#[derive(Clone, Debug)]
pub struct TxDatagram {
    header: GlobalHeader,
    bodies: Vec<u16>,
    body_pointer: Vec<usize>,
    num_bodies: usize,
}

impl TxDatagram {
    /// Creates a frame for the given device map (number of transducers per device).
    pub fn new(device_map: &[usize]) -> Self {
        let body_pointer = std::iter::once(0)
            .chain(device_map.iter().scan(0, |acc, &n| {
                *acc += n;
                Some(*acc)
            }))
            .collect::<Vec<_>>();
        Self {
            header: GlobalHeader::new(),
            bodies: vec![0; body_pointer[device_map.len()]],
            num_bodies: device_map.len(),
            body_pointer,
        }
    }

    pub fn num_devices(&self) -> usize {
        self.body_pointer.len() - 1
    }

    pub const fn num_bodies(&self) -> usize {
        self.num_bodies
    }

    pub fn set_num_bodies(&mut self, num_bodies: usize) {
        assert!(
            num_bodies <= self.num_devices(),
            "num_bodies ({}) exceeds the number of devices ({})",
            num_bodies,
            self.num_devices()
        );
        self.num_bodies = num_bodies;
    }

    /// Marks every body as written this cycle.
    pub fn write_all_bodies(&mut self) {
        self.num_bodies = self.num_devices();
    }

    pub fn transmitting_size(&self) -> usize {
        HEADER_SIZE + self.body_pointer[self.num_bodies] * size_of::<u16>()
    }

    /// Byte offset of the body of device `idx` inside the transmitted image.
    pub fn body_offset(&self, idx: usize) -> usize {
        HEADER_SIZE + self.body_pointer[idx] * size_of::<u16>()
    }

    /// Size in bytes of the body of device `idx`.
    pub fn body_size(&self, idx: usize) -> usize {
        (self.body_pointer[idx + 1] - self.body_pointer[idx]) * size_of::<u16>()
    }

    pub const fn header(&self) -> &GlobalHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut GlobalHeader {
        &mut self.header
    }

    pub fn body(&self, idx: usize) -> &[u16] {
        &self.bodies[self.body_pointer[idx]..self.body_pointer[idx + 1]]
    }

    pub fn body_mut(&mut self, idx: usize) -> &mut [u16] {
        &mut self.bodies[self.body_pointer[idx]..self.body_pointer[idx + 1]]
    }

    /// Iterates over the bodies of all devices.
    pub fn bodies(&self) -> impl Iterator<Item = &[u16]> {
        self.body_pointer
            .windows(2)
            .map(|w| &self.bodies[w[0]..w[1]])
    }

    /// Calls `f` with the index and body of every device.
    pub fn for_each_body_mut(&mut self, mut f: impl FnMut(usize, &mut [u16])) {
        self.body_pointer
            .windows(2)
            .enumerate()
            .for_each(|(i, w)| f(i, &mut self.bodies[w[0]..w[1]]));
    }

    /// Writes the transmitted image into `dst`. `dst` must be at least
    /// [`TxDatagram::transmitting_size`] bytes.
    pub fn write_to(&self, dst: &mut [u8]) {
        let size = self.transmitting_size();
        dst[..HEADER_SIZE].copy_from_slice(self.header.as_bytes());
        dst[HEADER_SIZE..size]
            .copy_from_slice(self.bodies[..self.body_pointer[self.num_bodies]].as_bytes());
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0; self.transmitting_size()];
        self.write_to(&mut buf);
        buf
    }

    pub fn clear(&mut self) {
        self.header = GlobalHeader::new();
        self.bodies.fill(0);
    }
}
