use autd3_v2_driver::{
    cpu::{MsgId, TxDatagram},
    firmware::{FirmwareRevision, Mode},
    fpga::{Drive, DEFAULT_CYCLE},
    operation::{FilterOp, GainOp},
};

use rand::Rng;

use crate::{create_cpus, create_geometry, send};

#[test]
fn send_filter() -> anyhow::Result<()> {
    let mut rng = rand::rng();

    let geometry = create_geometry(2, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();
    let n = geometry.num_transducers();

    let duty: Vec<i16> = (0..n).map(|_| rng.random_range(-2048..=2048)).collect();
    let phase: Vec<i16> = (0..n).map(|_| rng.random_range(-4096..=4096)).collect();
    send(
        &mut msg_id,
        &mut cpus,
        FilterOp::duty(duty.clone()),
        &geometry,
        &mut tx,
    )?;
    send(
        &mut msg_id,
        &mut cpus,
        FilterOp::phase(phase.clone()),
        &geometry,
        &mut tx,
    )?;

    let num = geometry.device_map()[0];
    cpus.iter()
        .zip(duty.chunks(num).zip(phase.chunks(num)))
        .for_each(|(cpu, (d, p))| {
            assert_eq!(d, cpu.fpga().duty_filters());
            assert_eq!(p, cpu.fpga().phase_filters());
        });

    Ok(())
}

#[test]
fn filters_shift_target() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();
    let n = geometry.num_transducers();

    send(
        &mut msg_id,
        &mut cpus,
        GainOp::new(vec![Drive::new(0., 1.); n]),
        &geometry,
        &mut tx,
    )?;
    send(
        &mut msg_id,
        &mut cpus,
        FilterOp::duty(vec![-48; n]),
        &geometry,
        &mut tx,
    )?;
    send(
        &mut msg_id,
        &mut cpus,
        FilterOp::phase(vec![-1; n]),
        &geometry,
        &mut tx,
    )?;

    assert!(cpus[0]
        .fpga()
        .target_drives()
        .into_iter()
        .all(|d| d == (DEFAULT_CYCLE / 2 - 48, DEFAULT_CYCLE - 1)));

    Ok(())
}
