mod focus;
mod gain;

pub use focus::*;
pub use gain::*;

use crate::{
    cpu::{CPUControlFlags, TxDatagram},
    error::AUTDInternalError,
    fpga::FPGAControlFlags,
    geometry::Geometry,
};

fn validate_idx(
    geometry: &Geometry,
    len: usize,
    start_idx: Option<u16>,
    finish_idx: Option<u16>,
) -> Result<(), AUTDInternalError> {
    if (start_idx.is_some() || finish_idx.is_some())
        && !geometry.limits().supports_stm_start_finish_idx
    {
        return Err(AUTDInternalError::NotSupported(
            "STM start/finish index",
            geometry.revision(),
        ));
    }
    if let Some(idx) = start_idx.filter(|&idx| idx as usize >= len) {
        return Err(AUTDInternalError::STMStartIndexOutOfRange(idx, len));
    }
    if let Some(idx) = finish_idx.filter(|&idx| idx as usize >= len) {
        return Err(AUTDInternalError::STMFinishIndexOutOfRange(idx, len));
    }
    Ok(())
}

fn validate_body_size(geometry: &Geometry, min_words: usize) -> Result<(), AUTDInternalError> {
    match geometry.iter().find(|dev| dev.num_transducers() < min_words) {
        Some(dev) => Err(AUTDInternalError::DeviceTooSmall(
            dev.idx(),
            dev.num_transducers(),
        )),
        None => Ok(()),
    }
}

fn set_stm_flags(
    geometry: &Geometry,
    tx: &mut TxDatagram,
    gain_mode: bool,
    start_idx: Option<u16>,
    finish_idx: Option<u16>,
    is_first: bool,
    is_last: bool,
) {
    let header = tx.header_mut();
    header.fpga_flag.set(FPGAControlFlags::STM_MODE, true);
    header.fpga_flag.set(FPGAControlFlags::STM_GAIN_MODE, gain_mode);
    header
        .fpga_flag
        .set(FPGAControlFlags::LEGACY_MODE, geometry.mode().is_legacy());
    header
        .fpga_flag
        .set(FPGAControlFlags::USE_START_IDX, start_idx.is_some());
    header
        .fpga_flag
        .set(FPGAControlFlags::USE_FINISH_IDX, finish_idx.is_some());

    header.cpu_flag.set(CPUControlFlags::WRITE_BODY, true);
    header.cpu_flag.set(CPUControlFlags::STM_BEGIN, is_first);
    header.cpu_flag.set(CPUControlFlags::STM_END, is_last);
}
