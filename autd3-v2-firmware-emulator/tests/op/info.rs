use autd3_v2_driver::{
    cpu::{MsgId, TxDatagram},
    firmware::{version::FPGAVersion, FirmwareRevision, Mode},
    operation::{FirmwareInfoOp, FirmwareInfoType},
};

use crate::{create_cpus, create_geometry, send};

#[rstest::rstest]
#[test]
#[case(FirmwareRevision::V2_2)]
#[case(FirmwareRevision::V2_4)]
#[case(FirmwareRevision::V2_7)]
fn read_firmware_info(#[case] revision: FirmwareRevision) -> anyhow::Result<()> {
    let geometry = create_geometry(2, Mode::Normal, revision);
    let mut cpus = create_cpus(&geometry);
    let mut tx = TxDatagram::new(&geometry.device_map());
    let mut msg_id = MsgId::new();

    [
        (FirmwareInfoType::CPUMajor, revision.version_num()),
        (FirmwareInfoType::CPUMinor, 0x00),
        (FirmwareInfoType::FPGAMajor, revision.version_num()),
        (FirmwareInfoType::FPGAMinor, 0x00),
        (
            FirmwareInfoType::FPGAFunctions,
            FPGAVersion::ENABLED_EMULATOR_BIT,
        ),
    ]
    .into_iter()
    .try_for_each(|(ty, expect)| -> anyhow::Result<()> {
        send(
            &mut msg_id,
            &mut cpus,
            FirmwareInfoOp::new(ty),
            &geometry,
            &mut tx,
        )?;
        cpus.iter().for_each(|cpu| {
            assert_eq!(Some(ty.msg_id()), cpu.msg_id());
            assert_eq!(expect, cpu.ack());
        });
        Ok(())
    })?;

    Ok(())
}
