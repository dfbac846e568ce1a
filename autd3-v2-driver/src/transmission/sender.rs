use std::time::{Duration, Instant};

use getset::{Getters, MutGetters};

use crate::{
    cpu::{MsgId, RxDatagram, TxDatagram},
    defined::DEFAULT_TIMEOUT,
    error::AUTDInternalError,
    firmware::version::{CPUVersion, FPGAVersion, FirmwareInfo, Major, Minor},
    fpga::{FPGAControlFlags, FPGAInfo},
    geometry::Geometry,
    link::Link,
    operation::{
        ClearOp, FirmwareInfoOp, FirmwareInfoType, Operation, OperationHandler, SyncOp,
        UpdateFlagsOp,
    },
};

use super::sleep::{Sleep, SpinSleeper};

/// The option of [`Sender`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SenderOption {
    /// The duration between sending frames.
    pub send_interval: Duration,
    /// The duration between polling acknowledgements.
    pub receive_interval: Duration,
    /// How long to wait for every device to acknowledge a frame.
    /// If zero, acknowledgements are not awaited.
    pub timeout: Duration,
}

impl Default for SenderOption {
    fn default() -> Self {
        Self {
            send_interval: Duration::from_millis(1),
            receive_interval: Duration::from_millis(1),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Drives operations frame by frame over a [`Link`].
///
/// A frame is sent only after every device has acknowledged the previous one.
#[derive(Getters, MutGetters)]
pub struct Sender<L: Link, S: Sleep = SpinSleeper> {
    #[getset(get = "pub", get_mut = "pub")]
    link: L,
    #[getset(get = "pub", get_mut = "pub")]
    geometry: Geometry,
    #[getset(get = "pub")]
    tx: TxDatagram,
    #[getset(get = "pub")]
    rx: RxDatagram,
    msg_id: MsgId,
    #[getset(get = "pub", get_mut = "pub")]
    option: SenderOption,
    sleeper: S,
}

impl<L: Link> Sender<L, SpinSleeper> {
    /// Opens `link` with the default option.
    pub fn open(link: L, geometry: Geometry) -> Result<Self, AUTDInternalError> {
        Self::open_with(link, geometry, SenderOption::default(), SpinSleeper::default())
    }
}

impl<L: Link, S: Sleep> Sender<L, S> {
    pub fn open_with(
        mut link: L,
        geometry: Geometry,
        option: SenderOption,
        sleeper: S,
    ) -> Result<Self, AUTDInternalError> {
        tracing::debug!(
            "opening link: {} devices, {} mode, firmware {}",
            geometry.num_devices(),
            geometry.mode(),
            geometry.revision()
        );
        link.open(&geometry)?;
        Ok(Self {
            tx: TxDatagram::new(&geometry.device_map()),
            rx: RxDatagram::new(geometry.num_devices()),
            link,
            geometry,
            msg_id: MsgId::new(),
            option,
            sleeper,
        })
    }

    /// Clears the devices and synchronizes them with the cycles of the geometry.
    pub fn initialize(&mut self) -> Result<(), AUTDInternalError> {
        self.send(UpdateFlagsOp::new(
            self.is_force_fan(),
            self.is_reads_fpga_info(),
        ))?;
        self.send(ClearOp::new())?;
        self.send(SyncOp::from_geometry(&self.geometry))
    }

    /// Sends `op` until it is finished.
    ///
    /// If an acknowledgement is not received within the timeout,
    /// [`AUTDInternalError::ConfirmResponseFailed`] is returned. An error code
    /// reported by a device is returned as the corresponding error.
    pub fn send(&mut self, mut op: impl Operation) -> Result<(), AUTDInternalError> {
        self.send_op(&mut op, true)
    }

    pub fn is_force_fan(&self) -> bool {
        self.tx.header().fpga_flag.contains(FPGAControlFlags::FORCE_FAN)
    }

    pub fn is_reads_fpga_info(&self) -> bool {
        self.tx
            .header()
            .fpga_flag
            .contains(FPGAControlFlags::READS_FPGA_INFO)
    }

    pub fn set_force_fan(&mut self, value: bool) -> Result<(), AUTDInternalError> {
        self.send(UpdateFlagsOp::new(value, self.is_reads_fpga_info()))
    }

    pub fn set_reads_fpga_info(&mut self, value: bool) -> Result<(), AUTDInternalError> {
        self.send(UpdateFlagsOp::new(self.is_force_fan(), value))
    }

    /// FPGA state of each device, available after `set_reads_fpga_info(true)`.
    pub fn fpga_info(&mut self) -> Result<Vec<FPGAInfo>, AUTDInternalError> {
        if !self.link.is_open() {
            return Err(AUTDInternalError::LinkClosed);
        }
        self.link.receive(&mut self.rx)?;
        Ok(self.rx.iter().map(|r| FPGAInfo::new(r.ack)).collect())
    }

    pub fn firmware_infos(&mut self) -> Result<Vec<FirmwareInfo>, AUTDInternalError> {
        let cpu_major = self.fetch_firm_info(FirmwareInfoType::CPUMajor)?;
        let cpu_minor = self.fetch_firm_info(FirmwareInfoType::CPUMinor)?;
        let fpga_major = self.fetch_firm_info(FirmwareInfoType::FPGAMajor)?;
        let fpga_minor = self.fetch_firm_info(FirmwareInfoType::FPGAMinor)?;
        let fpga_functions = self.fetch_firm_info(FirmwareInfoType::FPGAFunctions)?;

        let infos = self
            .geometry
            .iter()
            .map(|dev| FirmwareInfo {
                idx: dev.idx(),
                cpu: CPUVersion {
                    major: Major(cpu_major[dev.idx()]),
                    minor: Minor(cpu_minor[dev.idx()]),
                },
                fpga: FPGAVersion {
                    major: Major(fpga_major[dev.idx()]),
                    minor: Minor(fpga_minor[dev.idx()]),
                    function_bits: fpga_functions[dev.idx()],
                },
            })
            .collect::<Vec<_>>();
        infos
            .iter()
            .filter(|info| info.revision() != Some(self.geometry.revision()))
            .for_each(|info| {
                tracing::warn!(
                    "device {} runs {}, but the session assumes {}",
                    info.idx,
                    info.cpu,
                    self.geometry.revision()
                )
            });
        Ok(infos)
    }

    /// Clears the devices and closes the link.
    pub fn close(&mut self) -> Result<(), AUTDInternalError> {
        if !self.link.is_open() {
            return Ok(());
        }
        tracing::debug!("closing link");
        let res = self.send(ClearOp::new());
        self.link.close()?;
        res
    }
}

impl<L: Link, S: Sleep> Sender<L, S> {
    fn send_op(
        &mut self,
        op: &mut impl Operation,
        check_ack: bool,
    ) -> Result<(), AUTDInternalError> {
        if !self.link.is_open() {
            return Err(AUTDInternalError::LinkClosed);
        }

        OperationHandler::init(op, &self.geometry)?;

        let mut send_timing = Instant::now();
        let mut num_frames = 0;
        while !OperationHandler::is_finished(op) {
            self.msg_id.increment();
            OperationHandler::pack(op, &self.geometry, &mut self.tx, self.msg_id)?;
            self.send_receive(check_ack)?;
            num_frames += 1;

            if !OperationHandler::is_finished(op) {
                send_timing += self.option.send_interval;
                self.sleeper.sleep_until(send_timing);
            }
        }
        tracing::debug!("operation finished in {} frames", num_frames);

        Ok(())
    }

    fn send_receive(&mut self, check_ack: bool) -> Result<(), AUTDInternalError> {
        // Clear and the version reads reuse fixed ids.
        self.rx.reset();
        if !self.link.send(&self.tx)? {
            return Err(AUTDInternalError::SendDataFailed);
        }
        self.wait_msg_processed(check_ack)
    }

    fn wait_msg_processed(&mut self, check_ack: bool) -> Result<(), AUTDInternalError> {
        let msg_id = self.tx.header().msg_id;
        let timeout = self.option.timeout;
        if timeout.is_zero() {
            self.link.receive(&mut self.rx)?;
            return Ok(());
        }

        let start = Instant::now();
        let mut receive_timing = start;
        loop {
            if self.link.receive(&mut self.rx)? && self.rx.is_msg_processed(msg_id) {
                break;
            }
            if start.elapsed() > timeout {
                tracing::warn!(
                    "no acknowledgement of msg_id {:#04X} within {:?}",
                    msg_id,
                    timeout
                );
                return Err(AUTDInternalError::ConfirmResponseFailed);
            }
            receive_timing += self.option.receive_interval;
            self.sleeper.sleep_until(receive_timing);
        }

        if !check_ack {
            return Ok(());
        }
        self.rx.iter().enumerate().try_for_each(|(i, r)| {
            r.check().inspect_err(|e| {
                tracing::warn!("device {} reported {:#04X}: {}", i, r.ack, e);
            })
        })
    }

    fn fetch_firm_info(&mut self, ty: FirmwareInfoType) -> Result<Vec<u8>, AUTDInternalError> {
        self.send_op(&mut FirmwareInfoOp::new(ty), false)
            .map_err(|_| {
                AUTDInternalError::ReadFirmwareInfoFailed(
                    self.rx.iter().map(|r| r.msg_id == ty.msg_id()).collect(),
                )
            })?;
        Ok(self.rx.iter().map(|r| r.ack).collect())
    }
}

impl<L: Link, S: Sleep> Drop for Sender<L, S> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("failed to close link: {}", e);
        }
    }
}
