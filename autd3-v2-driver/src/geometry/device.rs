use getset::CopyGetters;

use crate::{
    error::AUTDInternalError,
    fpga::{CYCLE_MAX, DEFAULT_CYCLE},
};

/// One device of the device map.
#[derive(Debug, Clone, PartialEq, Eq, CopyGetters)]
pub struct Device {
    #[getset(get_copy = "pub")]
    idx: usize,
    cycles: Vec<u16>,
}

impl Device {
    pub fn new(idx: usize, num_transducers: usize) -> Self {
        Self {
            idx,
            cycles: vec![DEFAULT_CYCLE; num_transducers],
        }
    }

    pub fn num_transducers(&self) -> usize {
        self.cycles.len()
    }

    /// Drive cycle of each transducer in FPGA clocks.
    pub fn cycles(&self) -> &[u16] {
        &self.cycles
    }

    pub fn set_cycle(&mut self, local_idx: usize, cycle: u16) -> Result<(), AUTDInternalError> {
        if !(1..=CYCLE_MAX).contains(&cycle) {
            return Err(AUTDInternalError::CycleOutOfRange(cycle));
        }
        self.cycles[local_idx] = cycle;
        Ok(())
    }

    pub fn set_cycles(&mut self, cycle: u16) -> Result<(), AUTDInternalError> {
        (0..self.cycles.len()).try_for_each(|i| self.set_cycle(i, cycle))
    }
}
