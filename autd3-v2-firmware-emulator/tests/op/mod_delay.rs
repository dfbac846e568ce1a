use std::time::Duration;

use autd3_v2_driver::{
    cpu::{MsgId, TxDatagram},
    ethercat::DcSysTime,
    firmware::{FirmwareRevision, Mode},
    fpga::FPGA_CLK_FREQ,
    operation::{ModDelayOp, ModulationOp},
};

use rand::Rng;

use crate::{create_cpus, create_geometry, send};

#[rstest::rstest]
#[test]
#[case(Mode::Normal, FirmwareRevision::V2_7)]
#[case(Mode::Legacy, FirmwareRevision::V2_4)]
fn send_mod_delay(#[case] mode: Mode, #[case] revision: FirmwareRevision) -> anyhow::Result<()> {
    let mut rng = rand::rng();

    let geometry = create_geometry(2, mode, revision);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let delays: Vec<u16> = (0..geometry.num_transducers())
        .map(|_| rng.random())
        .collect();
    send(
        &mut msg_id,
        &mut cpus,
        ModDelayOp::new(delays.clone()),
        &geometry,
        &mut tx,
    )?;

    cpus.iter()
        .zip(delays.chunks(geometry.device_map()[0]))
        .for_each(|(cpu, d)| assert_eq!(d, cpu.fpga().mod_delays()));

    Ok(())
}

#[test]
fn delayed_index() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let freq_div = 40960;
    send(
        &mut msg_id,
        &mut cpus,
        ModulationOp::new((0..10).collect(), freq_div),
        &geometry,
        &mut tx,
    )?;
    let delays = (0..geometry.num_transducers() as u16).collect();
    send(
        &mut msg_id,
        &mut cpus,
        ModDelayOp::new(delays),
        &geometry,
        &mut tx,
    )?;

    let period = Duration::from_nanos(1_000_000_000 * freq_div as u64 / FPGA_CLK_FREQ as u64);
    let cpu = &mut cpus[0];
    cpu.update_with_sys_time(DcSysTime::ZERO + period * 3);
    assert_eq!(3, cpu.fpga().current_mod_idx());
    (0..cpu.num_transducers()).for_each(|i| {
        assert_eq!((3 + 10 - i % 10) % 10, cpu.fpga().delayed_mod_idx(i));
    });

    Ok(())
}
