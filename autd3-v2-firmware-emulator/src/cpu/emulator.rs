use autd3_v2_driver::{
    cpu::{CPUControlFlags, GlobalHeader, RxMessage, TxDatagram, MSG_CLEAR, MSG_END, MSG_NONE},
    ethercat::DcSysTime,
    firmware::{limits_for, FirmwareRevision, Limits, Mode},
    fpga::FPGAControlFlags,
};

use crate::{error::EmulatorError, fpga::emulator::FPGAEmulator};

use super::params::*;

/// Emulated CPU firmware of one device.
///
/// Decodes the frames addressed to the device and writes the result into its
/// [`FPGAEmulator`].
pub struct CPUEmulator {
    pub(crate) idx: usize,
    pub(crate) num_transducers: usize,
    pub(crate) revision: FirmwareRevision,
    pub(crate) last_msg_id: Option<u8>,
    pub(crate) ack: u8,
    pub(crate) ack_reports_info: bool,
    pub(crate) mod_write: Option<usize>,
    pub(crate) stm_write: Option<usize>,
    pub(crate) fpga: FPGAEmulator,
    pub(crate) synchronized: bool,
    pub(crate) dc_sys_time: DcSysTime,
}

impl CPUEmulator {
    #[must_use]
    pub fn new(idx: usize, num_transducers: usize, revision: FirmwareRevision) -> Self {
        Self {
            idx,
            num_transducers,
            revision,
            last_msg_id: None,
            ack: NO_ERR,
            ack_reports_info: false,
            mod_write: None,
            stm_write: None,
            fpga: FPGAEmulator::new(num_transducers),
            synchronized: false,
            dc_sys_time: DcSysTime::ZERO,
        }
    }

    #[must_use]
    pub const fn idx(&self) -> usize {
        self.idx
    }

    #[must_use]
    pub const fn num_transducers(&self) -> usize {
        self.num_transducers
    }

    #[must_use]
    pub const fn revision(&self) -> FirmwareRevision {
        self.revision
    }

    #[must_use]
    pub const fn synchronized(&self) -> bool {
        self.synchronized
    }

    #[must_use]
    pub const fn dc_sys_time(&self) -> DcSysTime {
        self.dc_sys_time
    }

    #[must_use]
    pub const fn fpga(&self) -> &FPGAEmulator {
        &self.fpga
    }

    #[must_use]
    pub fn fpga_mut(&mut self) -> &mut FPGAEmulator {
        &mut self.fpga
    }

    /// Id of the last processed frame.
    #[must_use]
    pub const fn msg_id(&self) -> Option<u8> {
        self.last_msg_id
    }

    /// Acknowledgement byte: an error code, a requested version byte, or the
    /// FPGA info while reads-FPGA-info is enabled.
    #[must_use]
    pub const fn ack(&self) -> u8 {
        if self.ack_reports_info {
            self.fpga.fpga_info().info()
        } else {
            self.ack
        }
    }

    #[must_use]
    pub const fn rx(&self) -> RxMessage {
        let msg_id = match self.last_msg_id {
            Some(id) => id,
            None => MSG_NONE,
        };
        RxMessage::new(self.ack(), msg_id)
    }

    pub fn update_with_sys_time(&mut self, sys_time: DcSysTime) {
        self.fpga.update_with_sys_time(sys_time);
        self.dc_sys_time = sys_time;
    }

    /// Processes the frame `tx`.
    ///
    /// A frame with the same id as the last processed one is ignored. On
    /// error the status code is reported in `ack` and the tables are left as
    /// they were.
    pub fn send(&mut self, tx: &TxDatagram) -> Result<(), EmulatorError> {
        let header = tx.header();
        if self.last_msg_id == Some(header.msg_id) {
            return Ok(());
        }
        self.last_msg_id = Some(header.msg_id);

        tracing::trace!(
            "device {}: msg_id = {:#04X}, fpga_flag = {}, cpu_flag = {}, size = {}",
            self.idx,
            header.msg_id,
            header.fpga_flag,
            header.cpu_flag,
            header.size
        );

        match self.handle(header, tx.body(self.idx)) {
            Ok(Some(ack)) => {
                self.ack = ack;
                self.ack_reports_info = false;
                Ok(())
            }
            Ok(None) => {
                self.ack = NO_ERR;
                self.ack_reports_info = self.fpga.is_reads_fpga_info();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("device {}: {} ({:#04X})", self.idx, e, e.code());
                self.ack = e.code();
                self.ack_reports_info = false;
                Err(e)
            }
        }
    }
}

impl CPUEmulator {
    pub(crate) fn limits(&self, fpga_flag: FPGAControlFlags) -> &'static Limits {
        let mode = if fpga_flag.contains(FPGAControlFlags::LEGACY_MODE) {
            Mode::Legacy
        } else {
            Mode::Normal
        };
        limits_for(mode, self.revision)
    }

    // Returns the ack byte for frames answering with data.
    fn handle(
        &mut self,
        header: &GlobalHeader,
        body: &[u16],
    ) -> Result<Option<u8>, EmulatorError> {
        match header.msg_id {
            MSG_CLEAR => {
                self.clear(header);
                Ok(None)
            }
            id if Self::is_info_msg(id) => Ok(Some(self.firmware_info(id))),
            id if id > MSG_END => Err(EmulatorError::InvalidMessageId(id)),
            _ => {
                self.handle_frame(header, body)?;
                Ok(None)
            }
        }
    }

    fn handle_frame(&mut self, header: &GlobalHeader, body: &[u16]) -> Result<(), EmulatorError> {
        let cpu_flag = header.cpu_flag;
        let fpga_flag = header.fpga_flag;

        if cpu_flag.contains(CPUControlFlags::MOD) {
            self.write_mod(header)?;
        } else if cpu_flag.contains(CPUControlFlags::CONFIG_SILENCER) {
            self.config_silencer(header)?;
        } else if cpu_flag.contains(CPUControlFlags::CONFIG_SYNC) {
            self.synchronize(header, body)?;
            self.fpga.flags = fpga_flag;
            return Ok(());
        }

        if cpu_flag.contains(CPUControlFlags::WRITE_BODY) {
            if cpu_flag.contains(CPUControlFlags::MOD_DELAY) {
                self.write_transducer_table(header, body)?;
            } else if fpga_flag.contains(FPGAControlFlags::STM_MODE) {
                if fpga_flag.contains(FPGAControlFlags::STM_GAIN_MODE) {
                    self.write_gain_stm(header, body)?;
                } else {
                    self.write_focus_stm(header, body)?;
                }
            } else {
                self.write_gain(header, body);
            }
        }

        self.fpga.flags = fpga_flag;
        Ok(())
    }
}
