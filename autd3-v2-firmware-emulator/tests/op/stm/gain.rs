use autd3_v2_driver::{
    cpu::{GainSTMMode, MsgId, TxDatagram},
    defined::PI,
    error::AUTDInternalError,
    firmware::{FirmwareRevision, Mode},
    fpga::{normal_duty, normal_phase, Drive, LegacyDrive, DEFAULT_CYCLE},
    geometry::Geometry,
    operation::{GainSTMOp, OperationHandler},
};

use itertools::Itertools;
use rand::Rng;

use crate::{create_cpus, create_geometry, send};

fn random_gains(n: usize, geometry: &Geometry) -> Vec<Vec<Drive>> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| {
            (0..geometry.num_transducers())
                .map(|_| {
                    Drive::new(rng.random_range(0.0..2.0 * PI), rng.random_range(0.0..1.0))
                })
                .collect()
        })
        .collect()
}

fn legacy_expect(d: &Drive, mode: GainSTMMode) -> (u16, u16) {
    let l = LegacyDrive::from(d);
    match mode {
        GainSTMMode::PhaseFull => (0xFF << 3, (l.phase as u16) << 4),
        GainSTMMode::PhaseHalf => (0xFF << 3, ((l.phase & 0xF0) as u16) << 4),
        GainSTMMode::PhaseDutyFull => ((l.duty as u16) << 3, (l.phase as u16) << 4),
    }
}

#[rstest::rstest]
#[test]
#[case(2, Mode::Normal, GainSTMMode::PhaseDutyFull)]
#[case(5, Mode::Normal, GainSTMMode::PhaseFull)]
#[case(1024, Mode::Normal, GainSTMMode::PhaseDutyFull)]
#[case(3, Mode::NormalPhase, GainSTMMode::PhaseDutyFull)]
fn send_gain_stm_normal(
    #[case] n: usize,
    #[case] mode: Mode,
    #[case] stm_mode: GainSTMMode,
) -> anyhow::Result<()> {
    let geometry = create_geometry(2, mode, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let gains = random_gains(n, &geometry);
    send(
        &mut msg_id,
        &mut cpus,
        GainSTMOp::new(gains.clone(), 512).with_mode(stm_mode),
        &geometry,
        &mut tx,
    )?;

    let with_duty = stm_mode == GainSTMMode::PhaseDutyFull && mode == Mode::Normal;
    cpus.iter().for_each(|cpu| {
        let fpga = cpu.fpga();
        assert!(fpga.is_stm_mode());
        assert!(fpga.is_stm_gain_mode());
        assert_eq!(n, fpga.stm_cycle());
        assert_eq!(512, fpga.stm_frequency_division());
        assert_eq!(stm_mode, fpga.gain_stm_mode());

        let offset = cpu.idx() * cpu.num_transducers();
        gains.iter().enumerate().for_each(|(i, gain)| {
            fpga.duties_and_phases(i)
                .into_iter()
                .zip(&gain[offset..offset + cpu.num_transducers()])
                .for_each(|((duty, phase), d)| {
                    let expect_duty = if with_duty {
                        normal_duty(d, DEFAULT_CYCLE)
                    } else {
                        DEFAULT_CYCLE / 2
                    };
                    assert_eq!(expect_duty, duty);
                    assert_eq!(normal_phase(d, DEFAULT_CYCLE), phase);
                });
        });
    });

    Ok(())
}

#[rstest::rstest]
#[test]
#[case(2, GainSTMMode::PhaseDutyFull)]
#[case(2, GainSTMMode::PhaseFull)]
#[case(3, GainSTMMode::PhaseFull)]
#[case(4, GainSTMMode::PhaseHalf)]
#[case(7, GainSTMMode::PhaseHalf)]
#[case(2048, GainSTMMode::PhaseHalf)]
fn send_gain_stm_legacy(#[case] n: usize, #[case] stm_mode: GainSTMMode) -> anyhow::Result<()> {
    let geometry = create_geometry(2, Mode::Legacy, FirmwareRevision::V2_4);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    let gains = random_gains(n, &geometry);
    send(
        &mut msg_id,
        &mut cpus,
        GainSTMOp::new(gains.clone(), 152).with_mode(stm_mode),
        &geometry,
        &mut tx,
    )?;

    cpus.iter().for_each(|cpu| {
        let fpga = cpu.fpga();
        assert!(fpga.is_legacy_mode());
        assert_eq!(n, fpga.stm_cycle());
        let offset = cpu.idx() * cpu.num_transducers();
        gains.iter().enumerate().for_each(|(i, gain)| {
            let expect = gain[offset..offset + cpu.num_transducers()]
                .iter()
                .map(|d| legacy_expect(d, stm_mode))
                .collect_vec();
            assert_eq!(expect, fpga.duties_and_phases(i));
        });
    });

    Ok(())
}

#[test]
fn send_gain_stm_with_idx() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_6);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        GainSTMOp::new(random_gains(4, &geometry), 276)
            .with_start_idx(Some(1))
            .with_finish_idx(Some(3)),
        &geometry,
        &mut tx,
    )?;
    assert_eq!(Some(1), cpus[0].fpga().stm_start_idx());
    assert_eq!(Some(3), cpus[0].fpga().stm_finish_idx());

    Ok(())
}

#[test]
fn phase_half_rejected_in_normal_mode() -> anyhow::Result<()> {
    let geometry = create_geometry(1, Mode::Normal, FirmwareRevision::V2_7);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    send(
        &mut msg_id,
        &mut cpus,
        GainSTMOp::new(random_gains(2, &geometry), 512),
        &geometry,
        &mut tx,
    )?;

    // Forge a head frame the host would refuse to build.
    let mut op = GainSTMOp::new(random_gains(2, &geometry), 512);
    OperationHandler::init(&mut op, &geometry)?;
    msg_id.increment();
    OperationHandler::pack(&mut op, &geometry, &mut tx, msg_id)?;
    tx.body_mut(0)[2] = GainSTMMode::PhaseHalf as u16;
    assert!(cpus[0].send(&tx).is_err());
    assert_eq!(Err(AUTDInternalError::InvalidGainSTMMode), cpus[0].rx().check());
    assert_eq!(2, cpus[0].fpga().stm_cycle());

    Ok(())
}
