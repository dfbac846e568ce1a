use std::time::Duration;

use autd3_v2_driver::{
    defined::PI,
    error::AUTDInternalError,
    firmware::{FirmwareRevision, Mode},
    fpga::{Drive, LEGACY_CYCLE, SILENCER_CYCLE_DEFAULT},
    link::Link,
    operation::{ClearOp, GainOp, ModulationOp, SilencerOp},
    transmission::{Sender, SenderOption, StdSleeper},
};
use autd3_v2_firmware_emulator::{CPUEmulator, Emulator};

use rand::Rng;

use crate::create_geometry;

fn open(mode: Mode, revision: FirmwareRevision) -> anyhow::Result<Sender<Emulator, StdSleeper>> {
    Ok(Sender::open_with(
        Emulator::new(),
        create_geometry(2, mode, revision),
        SenderOption {
            send_interval: Duration::ZERO,
            receive_interval: Duration::ZERO,
            timeout: Duration::from_millis(100),
        },
        StdSleeper,
    )?)
}

#[test]
fn initialize() -> anyhow::Result<()> {
    let mut sender = open(Mode::Legacy, FirmwareRevision::V2_4)?;
    sender.initialize()?;

    assert!(sender.link().iter().all(|cpu| cpu.synchronized()));
    assert!(sender
        .link()
        .emulators()
        .all(|fpga| fpga.cycles().iter().all(|&c| c == LEGACY_CYCLE)));

    Ok(())
}

#[rstest::rstest]
#[test]
#[case(FirmwareRevision::V2_2)]
#[case(FirmwareRevision::V2_7)]
fn firmware_infos(#[case] revision: FirmwareRevision) -> anyhow::Result<()> {
    let mut sender = open(Mode::Normal, revision)?;
    let infos = sender.firmware_infos()?;

    assert_eq!(2, infos.len());
    infos.iter().for_each(|info| {
        assert_eq!(Some(revision), info.revision());
        assert!(info.is_emulator());
    });

    Ok(())
}

#[test]
fn send_operations() -> anyhow::Result<()> {
    let mut rng = rand::rng();

    let mut sender = open(Mode::Normal, FirmwareRevision::V2_7)?;
    sender.initialize()?;

    let buf: Vec<u8> = (0..1000).map(|_| rng.random()).collect();
    sender.send(SilencerOp::new(1000, 20))?;
    sender.send(ModulationOp::new(buf.clone(), 1024))?;
    let drives = (0..sender.geometry().num_transducers())
        .map(|_| Drive::new(rng.random_range(0.0..2.0 * PI), 1.))
        .collect();
    sender.send(GainOp::new(drives))?;

    sender.link().emulators().for_each(|fpga| {
        assert_eq!(1000, fpga.silencer_cycle());
        assert_eq!(20, fpga.silencer_step());
        assert_eq!(buf, fpga.modulation());
        assert!(fpga.duties_and_phases(0).iter().all(|&(d, _)| d == 2048));
    });

    Ok(())
}

#[test]
fn device_error_is_returned() -> anyhow::Result<()> {
    let mut sender = open(Mode::Normal, FirmwareRevision::V2_7)?;
    sender.initialize()?;

    // A device running older firmware refuses the fast modulation divisor.
    let num_transducers = sender.geometry()[1].num_transducers();
    sender.link_mut()[1] = CPUEmulator::new(1, num_transducers, FirmwareRevision::V2_6);
    assert_eq!(
        Err(AUTDInternalError::ModulationFreqDivTooSmall),
        sender.send(ModulationOp::new(vec![0; 10], 512))
    );
    assert_eq!(10, sender.link()[0].fpga().modulation_cycle());

    Ok(())
}

#[test]
fn fpga_info() -> anyhow::Result<()> {
    let mut sender = open(Mode::Normal, FirmwareRevision::V2_7)?;
    sender.initialize()?;

    sender.set_reads_fpga_info(true)?;
    sender.link_mut().emulators_mut().for_each(|fpga| {
        fpga.assert_thermal_sensor();
    });
    assert!(sender.fpga_info()?.iter().all(|info| info.is_thermal_assert()));

    sender.link_mut()[0].fpga_mut().deassert_thermal_sensor();
    let infos = sender.fpga_info()?;
    assert!(!infos[0].is_thermal_assert());
    assert!(infos[1].is_thermal_assert());

    Ok(())
}

#[test]
fn close() -> anyhow::Result<()> {
    let mut sender = open(Mode::Normal, FirmwareRevision::V2_7)?;
    sender.send(SilencerOp::new(1000, 20))?;
    sender.close()?;

    assert!(!sender.link().is_open());
    assert!(sender
        .link()
        .emulators()
        .all(|fpga| fpga.silencer_cycle() == SILENCER_CYCLE_DEFAULT));
    assert_eq!(Err(AUTDInternalError::LinkClosed), sender.send(ClearOp::new()));

    Ok(())
}
