use std::time::Duration;

use anyhow::Result;

use autd3_v2_driver::{
    autd3_device::AUTD3,
    defined::PI,
    firmware::{FirmwareRevision, Mode},
    fpga::Drive,
    geometry::{Geometry, Vector3},
    operation::{ControlPoint, FocusSTMOp, GainOp, ModulationOp, SilencerOp},
    transmission::{Sender, SenderOption, StdSleeper},
};
use autd3_v2_firmware_emulator::Emulator;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let geometry = Geometry::new(
        &[AUTD3::NUM_TRANS_IN_UNIT, AUTD3::NUM_TRANS_IN_UNIT],
        Mode::Normal,
        FirmwareRevision::V2_7,
    );
    let mut sender = Sender::open_with(
        Emulator::new(),
        geometry,
        SenderOption {
            send_interval: Duration::ZERO,
            receive_interval: Duration::ZERO,
            ..SenderOption::default()
        },
        StdSleeper,
    )?;

    sender.initialize()?;
    sender
        .firmware_infos()?
        .iter()
        .for_each(|info| println!("{}", info));

    sender.send(SilencerOp::default())?;

    // 150 Hz sine sampled at 4 kHz
    let buf = (0..80)
        .map(|i| ((0.5 + 0.5 * (2. * PI * i as f64 / 80.).sin()) * 255.).round() as u8)
        .collect();
    sender.send(ModulationOp::new(buf, 40960))?;

    let drives = (0..sender.geometry().num_transducers())
        .map(|i| Drive::new(2. * PI * (i % 18) as f64 / 18., 1.))
        .collect();
    sender.send(GainOp::new(drives))?;
    println!(
        "gain: {:?}",
        &sender.link()[0].fpga().duties_and_phases(0)[..4]
    );

    let center = Vector3::new(86.6, 66.0, 150.0);
    let points = (0..200)
        .map(|i| {
            let theta = 2. * PI * i as f64 / 200.;
            ControlPoint::new(center + 30. * Vector3::new(theta.cos(), theta.sin(), 0.))
        })
        .collect();
    sender.send(FocusSTMOp::new(points, 8192))?;

    sender.set_reads_fpga_info(true)?;
    sender.link_mut().emulators_mut().for_each(|fpga| {
        fpga.assert_thermal_sensor();
    });
    sender
        .fpga_info()?
        .iter()
        .enumerate()
        .for_each(|(i, info)| println!("device {}: thermal {}", i, info.is_thermal_assert()));

    std::thread::sleep(Duration::from_millis(10));
    sender.link().iter().for_each(|cpu| {
        println!(
            "device {}: stm {}/{}",
            cpu.idx(),
            cpu.fpga().current_stm_idx(),
            cpu.fpga().stm_cycle()
        )
    });

    sender.close()?;

    Ok(())
}
