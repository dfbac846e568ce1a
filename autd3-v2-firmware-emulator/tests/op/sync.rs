use autd3_v2_driver::{
    cpu::{MsgId, TxDatagram},
    error::AUTDInternalError,
    firmware::{FirmwareRevision, Mode},
    fpga::{CYCLE_MAX, LEGACY_CYCLE},
    operation::SyncOp,
};

use rand::Rng;

use crate::{create_cpus, create_geometry, send};

#[test]
fn send_sync() -> anyhow::Result<()> {
    let mut rng = rand::rng();

    let geometry = create_geometry(2, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let cycles: Vec<u16> = (0..geometry.num_transducers())
        .map(|_| rng.random_range(1..=CYCLE_MAX))
        .collect();
    assert!(cpus.iter().all(|cpu| !cpu.synchronized()));
    send(
        &mut msg_id,
        &mut cpus,
        SyncOp::new(cycles.clone()),
        &geometry,
        &mut tx,
    )?;

    assert!(cpus.iter().all(|cpu| cpu.synchronized()));
    cpus.iter()
        .zip(cycles.chunks(geometry.device_map()[0]))
        .for_each(|(cpu, c)| assert_eq!(c, cpu.fpga().cycles()));

    Ok(())
}

#[test]
fn send_sync_legacy() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Legacy, FirmwareRevision::V2_2);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        SyncOp::from_geometry(&geometry),
        &geometry,
        &mut tx,
    )?;
    assert!(cpus[0].synchronized());
    assert!(cpus[0].fpga().cycles().iter().all(|&c| c == LEGACY_CYCLE));
    assert!(cpus[0].fpga().is_legacy_mode());

    Ok(())
}

#[test]
fn invalid_cycle_in_frame() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        SyncOp::from_geometry(&geometry),
        &geometry,
        &mut tx,
    )?;

    msg_id.increment();
    tx.header_mut().msg_id = msg_id.get();
    tx.body_mut(0)[10] = 0;
    assert!(cpus[0].send(&tx).is_err());
    assert_eq!(Err(AUTDInternalError::InvalidSyncCycle), cpus[0].rx().check());

    Ok(())
}
