use std::time::Duration;

use autd3_v2_driver::{
    cpu::{MsgId, TxDatagram},
    defined::PI,
    ethercat::DcSysTime,
    firmware::{FirmwareRevision, Mode},
    fpga::{normal_duty, normal_phase, Drive, DEFAULT_CYCLE},
    operation::{GainOp, SilencerOp},
};

use rand::Rng;

use crate::{create_cpus, create_geometry, send};

#[rstest::rstest]
#[test]
#[case(FirmwareRevision::V2_7, 522, 1)]
#[case(FirmwareRevision::V2_6, 1044, 1)]
#[case(FirmwareRevision::V2_7, 4096, 10)]
#[case(FirmwareRevision::V2_7, u16::MAX, u16::MAX)]
fn send_silencer(
    #[case] revision: FirmwareRevision,
    #[case] cycle: u16,
    #[case] step: u16,
) -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, revision);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        SilencerOp::new(cycle, step),
        &geometry,
        &mut tx,
    )?;

    assert_eq!(cycle, cpus[0].fpga().silencer_cycle());
    assert_eq!(step, cpus[0].fpga().silencer_step());

    Ok(())
}

#[test]
fn output_reaches_target() -> anyhow::Result<()> {
    let mut rng = rand::rng();

    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let step = 8;
    send(
        &mut msg_id,
        &mut cpus,
        SilencerOp::new(4096, step),
        &geometry,
        &mut tx,
    )?;

    let drives: Vec<_> = (0..geometry.num_transducers())
        .map(|_| Drive::new(rng.random_range(0.0..2.0 * PI), rng.random_range(0.0..1.0)))
        .collect();
    send(
        &mut msg_id,
        &mut cpus,
        GainOp::new(drives.clone()),
        &geometry,
        &mut tx,
    )?;
    let target = drives
        .iter()
        .map(|d| (normal_duty(d, DEFAULT_CYCLE), normal_phase(d, DEFAULT_CYCLE)))
        .collect::<Vec<_>>();

    let cpu = &mut cpus[0];
    assert!(cpu.fpga().output_drives().iter().all(|&d| d == (0, 0)));

    // One update every 4096 clocks of 163.84 MHz, i.e. every 25 us.
    let update = Duration::from_micros(25);
    cpu.update_with_sys_time(DcSysTime::ZERO + update * 10);
    cpu.fpga()
        .output_drives()
        .iter()
        .zip(target.iter())
        .for_each(|(&(duty, _), &(target_duty, _))| {
            assert_eq!(target_duty.min(step * 10), duty);
        });

    // Each value needs at most `DEFAULT_CYCLE / step` updates.
    cpu.update_with_sys_time(DcSysTime::ZERO + update * (DEFAULT_CYCLE / step) as u32);
    assert_eq!(target, cpu.fpga().output_drives());

    Ok(())
}
