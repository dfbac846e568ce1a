use std::time::Duration;

use autd3_v2_driver::{
    cpu::{MsgId, TxDatagram},
    ethercat::DcSysTime,
    firmware::{FirmwareRevision, Mode},
    fpga::{STMFocus, FPGA_CLK_FREQ},
    geometry::Vector3,
    operation::{ControlPoint, FocusSTMOp},
};

use rand::Rng;

use crate::{create_cpus, create_geometry, send};

fn random_points(n: usize) -> Vec<ControlPoint> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| {
            ControlPoint::new(Vector3::new(
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
                rng.random_range(0.0..500.0),
            ))
            .with_duty_shift(rng.random_range(0..=15))
        })
        .collect()
}

#[rstest::rstest]
#[test]
#[case(2, FirmwareRevision::V2_7)]
#[case(60, FirmwareRevision::V2_7)]
#[case(61, FirmwareRevision::V2_2)]
#[case(1000, FirmwareRevision::V2_5)]
fn send_focus_stm(#[case] n: usize, #[case] revision: FirmwareRevision) -> anyhow::Result<()> {
    let mut rng = rand::rng();

    let geometry = create_geometry(2, Mode::Normal, revision);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let points = random_points(n);
    let freq_div = rng.random_range(geometry.limits().focus_stm_sampling_freq_div_min..=u32::MAX);
    send(
        &mut msg_id,
        &mut cpus,
        FocusSTMOp::new(points.clone(), freq_div),
        &geometry,
        &mut tx,
    )?;

    let expect = points
        .iter()
        .map(|p| STMFocus::create(p.point(), p.duty_shift()))
        .collect::<Result<Vec<_>, _>>()?;
    cpus.iter().for_each(|cpu| {
        let fpga = cpu.fpga();
        assert!(fpga.is_stm_mode());
        assert!(!fpga.is_stm_gain_mode());
        assert_eq!(n, fpga.stm_cycle());
        assert_eq!(freq_div, fpga.stm_frequency_division());
        assert_eq!(
            (geometry.sound_speed() * 1024.0).round() as u32,
            fpga.sound_speed()
        );
        assert_eq!(None, fpga.stm_start_idx());
        assert_eq!(None, fpga.stm_finish_idx());
        assert_eq!(expect, fpga.foci());
    });

    Ok(())
}

#[rstest::rstest]
#[test]
#[case(Some(0), None)]
#[case(None, Some(9))]
#[case(Some(3), Some(7))]
fn send_focus_stm_with_idx(
    #[case] start_idx: Option<u16>,
    #[case] finish_idx: Option<u16>,
) -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_6);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        FocusSTMOp::new(random_points(10), 1612)
            .with_start_idx(start_idx)
            .with_finish_idx(finish_idx),
        &geometry,
        &mut tx,
    )?;

    assert_eq!(start_idx, cpus[0].fpga().stm_start_idx());
    assert_eq!(finish_idx, cpus[0].fpga().stm_finish_idx());

    Ok(())
}

#[test]
fn stm_idx_follows_sys_time() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let freq_div = 4096;
    let points = random_points(7);
    send(
        &mut msg_id,
        &mut cpus,
        FocusSTMOp::new(points, freq_div),
        &geometry,
        &mut tx,
    )?;

    let period = Duration::from_nanos(1_000_000_000 * freq_div as u64 / FPGA_CLK_FREQ as u64);
    let cpu = &mut cpus[0];
    (0..20).for_each(|i| {
        cpu.update_with_sys_time(DcSysTime::ZERO + period * i);
        let idx = i as usize % 7;
        assert_eq!(idx, cpu.fpga().current_stm_idx());
        assert_eq!(
            cpu.fpga().duties_and_phases(idx),
            cpu.fpga().target_drives()
        );
    });

    Ok(())
}

#[rstest::rstest]
#[test]
#[case(0.)]
#[case(15.)]
#[case(30.)]
fn sound_speed_from_temperature(#[case] temp: f64) -> anyhow::Result<()> {
    let mut geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    geometry.set_sound_speed_from_temp(temp);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        FocusSTMOp::new(random_points(2), 512),
        &geometry,
        &mut tx,
    )?;

    approx::assert_abs_diff_eq!(
        geometry.sound_speed(),
        cpus[0].fpga().sound_speed() as f64 / 1024.,
        epsilon = 1. / 1024.
    );

    Ok(())
}
