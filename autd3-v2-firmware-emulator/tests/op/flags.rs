use autd3_v2_driver::{
    cpu::{MsgId, TxDatagram},
    firmware::{FirmwareRevision, Mode},
    fpga::FPGAInfo,
    operation::{SilencerOp, UpdateFlagsOp},
};

use crate::{create_cpus, create_geometry, send};

#[rstest::rstest]
#[test]
#[case(true)]
#[case(false)]
fn force_fan(#[case] value: bool) -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        UpdateFlagsOp::new(value, false),
        &geometry,
        &mut tx,
    )?;
    assert_eq!(value, cpus[0].fpga().is_force_fan());

    send(
        &mut msg_id,
        &mut cpus,
        SilencerOp::default(),
        &geometry,
        &mut tx,
    )?;
    assert_eq!(value, cpus[0].fpga().is_force_fan());

    Ok(())
}

#[test]
fn reads_fpga_info() -> anyhow::Result<()> {
    let geometry = create_geometry(2, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    cpus[1].fpga_mut().assert_thermal_sensor();
    send(
        &mut msg_id,
        &mut cpus,
        UpdateFlagsOp::new(false, false),
        &geometry,
        &mut tx,
    )?;
    assert!(cpus.iter().all(|cpu| cpu.ack() == 0));

    send(
        &mut msg_id,
        &mut cpus,
        UpdateFlagsOp::new(false, true),
        &geometry,
        &mut tx,
    )?;
    assert!(cpus.iter().all(|cpu| cpu.fpga().is_reads_fpga_info()));
    let infos = cpus
        .iter()
        .map(|cpu| FPGAInfo::new(cpu.rx().ack))
        .collect::<Vec<_>>();
    assert!(!infos[0].is_thermal_assert());
    assert!(infos[1].is_thermal_assert());

    cpus[1].fpga_mut().deassert_thermal_sensor();
    assert!(!FPGAInfo::new(cpus[1].rx().ack).is_thermal_assert());

    Ok(())
}
