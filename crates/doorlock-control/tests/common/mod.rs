//! Test rig for driving a Control node from a scripted HMI.
//!
//! The rig wires a [`ControlNode`] to mock peripherals over an in-memory
//! link. The `hmi_*` helpers play the HMI side of one exchange and return
//! the status byte the node answered with.

#![allow(dead_code)]

use doorlock_control::ControlNode;
use doorlock_core::constants::CONTROL_READY;
use doorlock_core::{LockConfig, Result};
use doorlock_hardware::mock::{
    BuzzerHandle, EepromHandle, MockBuzzer, MockEeprom, MockMotor, MotorHandle,
};
use doorlock_protocol::{Channel, Command, SerialLink, issue_command};
use tokio::io::DuplexStream;

pub type Link = SerialLink<DuplexStream>;
pub type Node = ControlNode<Link, MockEeprom, MockMotor, MockBuzzer>;

/// Store address used by every rig.
pub const PASSWORD_ADDRESS: u16 = 0x0111;

pub struct Rig {
    pub node: Node,
    pub hmi: Link,
    pub store: EepromHandle,
    pub motor: MotorHandle,
    pub buzzer: BuzzerHandle,
}

/// A node with an erased store.
pub fn rig() -> Rig {
    let (eeprom, store) = MockEeprom::new();
    build(eeprom, store)
}

/// A node whose store already holds `password`.
pub fn rig_with_password(password: [u8; 5]) -> Rig {
    let (eeprom, store) =
        MockEeprom::with_contents(PASSWORD_ADDRESS, &password).expect("preload fits");
    build(eeprom, store)
}

fn build(eeprom: MockEeprom, store: EepromHandle) -> Rig {
    let (control_end, hmi) = SerialLink::pair();
    let (motor, motor_handle) = MockMotor::new();
    let (buzzer, buzzer_handle) = MockBuzzer::new();
    let node = ControlNode::new(control_end, eeprom, motor, buzzer, LockConfig::default())
        .expect("default config is valid");

    Rig {
        node,
        hmi,
        store,
        motor: motor_handle,
        buzzer: buzzer_handle,
    }
}

/// HMI side of SetPassword; returns the single status byte.
pub async fn hmi_set_password(hmi: &mut Link, password: [u8; 5], verification: [u8; 5]) -> Result<u8> {
    issue_command(hmi, Command::SetPassword).await?;
    assert_eq!(hmi.receive_byte().await?, CONTROL_READY);
    hmi.send_buffer(&password).await?;
    assert_eq!(hmi.receive_byte().await?, CONTROL_READY);
    hmi.send_buffer(&verification).await?;
    hmi.receive_byte().await
}

/// HMI side of CheckPassword; returns the status byte after the ready byte.
pub async fn hmi_check_password(hmi: &mut Link, password: [u8; 5]) -> Result<u8> {
    issue_command(hmi, Command::CheckPassword).await?;
    assert_eq!(hmi.receive_byte().await?, CONTROL_READY);
    hmi.send_buffer(&password).await?;
    assert_eq!(hmi.receive_byte().await?, CONTROL_READY);
    hmi.receive_byte().await
}
