mod focus;
mod gain;

use autd3_v2_driver::{firmware::Limits, fpga::FPGAControlFlags};

use crate::error::EmulatorError;

fn uses_idx(fpga_flag: FPGAControlFlags) -> bool {
    fpga_flag.intersects(FPGAControlFlags::USE_START_IDX | FPGAControlFlags::USE_FINISH_IDX)
}

fn check_idx_supported(
    limits: &Limits,
    fpga_flag: FPGAControlFlags,
) -> Result<(), EmulatorError> {
    if uses_idx(fpga_flag) && !limits.supports_stm_start_finish_idx {
        return Err(EmulatorError::NotSupported);
    }
    Ok(())
}

fn check_idx_range(
    fpga_flag: FPGAControlFlags,
    start_idx: u16,
    finish_idx: u16,
    len: usize,
) -> Result<(), EmulatorError> {
    [
        (FPGAControlFlags::USE_START_IDX, start_idx),
        (FPGAControlFlags::USE_FINISH_IDX, finish_idx),
    ]
    .into_iter()
    .filter(|&(flag, _)| fpga_flag.contains(flag))
    .try_for_each(|(_, idx)| {
        if idx as usize >= len {
            Err(EmulatorError::StartIdxOutOfRange(idx))
        } else {
            Ok(())
        }
    })
}

fn read_u32(body: &[u16], idx: usize) -> u32 {
    body[idx] as u32 | (body[idx + 1] as u32) << 16
}
