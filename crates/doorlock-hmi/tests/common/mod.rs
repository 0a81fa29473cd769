//! Test rig for driving an HMI node against a scripted Control peer.
//!
//! Keys are queued on the keypad handle before the node runs; the
//! `control_*` helpers play the Control side of one exchange.

#![allow(dead_code)]

use doorlock_core::constants::{CHECK_PASSWORD, SET_PASSWORD};
use doorlock_core::{LockConfig, Result};
use doorlock_hardware::mock::{LcdHandle, MockKeypad, MockKeypadHandle, VirtualLcd};
use doorlock_hmi::HmiNode;
use doorlock_protocol::{Channel, ReadyToken, Status, await_token, send_token};
use tokio::io::DuplexStream;

pub type Link = doorlock_protocol::SerialLink<DuplexStream>;
pub type Node = HmiNode<Link, MockKeypad, VirtualLcd>;

pub struct Rig {
    pub node: Node,
    pub control: Link,
    pub keys: MockKeypadHandle,
    pub lcd: LcdHandle,
}

pub fn rig() -> Rig {
    let (control, hmi_end) = Link::pair();
    let (keypad, keys) = MockKeypad::new();
    let (display, lcd) = VirtualLcd::new();
    let node = HmiNode::new(hmi_end, keypad, display, LockConfig::default())
        .expect("default config is valid");

    Rig {
        node,
        control,
        keys,
        lcd,
    }
}

/// Wait for the HMI ready byte and return the command byte after it.
pub async fn control_next_command(control: &mut Link) -> Result<u8> {
    await_token(control, ReadyToken::Hmi).await?;
    control.receive_byte().await
}

/// Control side of SetPassword; answers `status` and returns both entries.
pub async fn control_serve_set(control: &mut Link, status: Status) -> Result<([u8; 5], [u8; 5])> {
    assert_eq!(control_next_command(control).await?, SET_PASSWORD);
    send_token(control, ReadyToken::Control).await?;
    let password = control.receive_buffer().await?;
    send_token(control, ReadyToken::Control).await?;
    let verification = control.receive_buffer().await?;
    control.send_byte(status.into()).await?;
    Ok((password, verification))
}

/// Control side of CheckPassword; answers `status` and returns the entry.
pub async fn control_serve_check(control: &mut Link, status: Status) -> Result<[u8; 5]> {
    assert_eq!(control_next_command(control).await?, CHECK_PASSWORD);
    send_token(control, ReadyToken::Control).await?;
    let candidate = control.receive_buffer().await?;
    send_token(control, ReadyToken::Control).await?;
    control.send_byte(status.into()).await?;
    Ok(candidate)
}

/// Provision `digits` on a fresh rig.
pub async fn provision(rig: &mut Rig, digits: [u8; 5]) {
    rig.keys.send_password(&digits).await.unwrap();
    rig.keys.send_password(&digits).await.unwrap();

    let (rounds, entries) = tokio::join!(
        rig.node.provision(),
        control_serve_set(&mut rig.control, Status::Matched)
    );
    assert_eq!(rounds.unwrap(), 1);
    assert_eq!(entries.unwrap(), (digits, digits));
}
