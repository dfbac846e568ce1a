use std::time::Duration;

use autd3_v2_driver::{
    cpu::{CPUControlFlags, MsgId, TxDatagram},
    error::AUTDInternalError,
    ethercat::DcSysTime,
    firmware::{FirmwareRevision, Mode},
    fpga::FPGA_CLK_FREQ,
    operation::ModulationOp,
};

use rand::Rng;

use crate::{create_cpus, create_geometry, send};

#[rstest::rstest]
#[test]
#[case(2, Mode::Normal, FirmwareRevision::V2_7)]
#[case(120, Mode::Normal, FirmwareRevision::V2_7)]
#[case(121, Mode::Legacy, FirmwareRevision::V2_2)]
#[case(244, Mode::NormalPhase, FirmwareRevision::V2_5)]
#[case(65536, Mode::Normal, FirmwareRevision::V2_7)]
fn send_mod(
    #[case] n: usize,
    #[case] mode: Mode,
    #[case] revision: FirmwareRevision,
) -> anyhow::Result<()> {
    let mut rng = rand::rng();

    let geometry = create_geometry(2, mode, revision);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let buf: Vec<u8> = (0..n).map(|_| rng.random()).collect();
    let freq_div = rng.random_range(geometry.limits().mod_sampling_freq_div_min..=u32::MAX);
    send(
        &mut msg_id,
        &mut cpus,
        ModulationOp::new(buf.clone(), freq_div),
        &geometry,
        &mut tx,
    )?;

    cpus.iter().for_each(|cpu| {
        assert_eq!(n, cpu.fpga().modulation_cycle());
        assert_eq!(freq_div, cpu.fpga().modulation_frequency_division());
        assert_eq!(buf, cpu.fpga().modulation());
    });

    Ok(())
}

#[test]
fn interrupted_stream() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        ModulationOp::new(vec![0x80; 10], 40960),
        &geometry,
        &mut tx,
    )?;

    // A continuation frame without a preceding head frame.
    msg_id.increment();
    let header = tx.header_mut();
    header.msg_id = msg_id.get();
    header
        .cpu_flag
        .remove(CPUControlFlags::MOD_BEGIN | CPUControlFlags::MOD_END);
    assert!(cpus[0].send(&tx).is_err());
    assert_eq!(Err(AUTDInternalError::StreamNotStarted), cpus[0].rx().check());
    assert_eq!(vec![0x80; 10], cpus[0].fpga().modulation());

    Ok(())
}

#[test]
fn mod_idx_follows_sys_time() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let freq_div = 40960;
    send(
        &mut msg_id,
        &mut cpus,
        ModulationOp::new(vec![0; 100], freq_div),
        &geometry,
        &mut tx,
    )?;

    let period = Duration::from_nanos(1_000_000_000 * freq_div as u64 / FPGA_CLK_FREQ as u64);
    let cpu = &mut cpus[0];
    assert_eq!(0, cpu.fpga().current_mod_idx());
    (0..250).for_each(|i| {
        cpu.update_with_sys_time(DcSysTime::ZERO + period * i);
        assert_eq!(i as usize % 100, cpu.fpga().current_mod_idx());
    });

    Ok(())
}

#[rstest::rstest]
#[test]
#[case(0, time::macros::datetime!(2000-01-01 0:00:00 UTC))]
#[case(2, time::macros::datetime!(2000-01-01 0:00:00.0255 UTC))]
#[case(99, time::macros::datetime!(2000-01-01 0:00:00.02475 UTC))]
#[case(0, time::macros::datetime!(2000-01-01 0:00:01 UTC))]
fn mod_idx_at_utc(#[case] expect: usize, #[case] utc: time::OffsetDateTime) -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        ModulationOp::new(vec![0; 100], 40960),
        &geometry,
        &mut tx,
    )?;

    cpus[0].update_with_sys_time(DcSysTime::from_utc(utc)?);
    assert_eq!(expect, cpus[0].fpga().current_mod_idx());

    Ok(())
}
