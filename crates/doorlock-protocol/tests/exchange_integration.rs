//! Exchange sequences over a real in-memory link.
//!
//! Each test plays both ends of an exchange with the handshake primitives,
//! checking that the bytes land in the order both nodes rely on.

use doorlock_core::Error;
use doorlock_protocol::{
    Channel, Command, ReadyToken, SerialLink, Status, await_token, issue_command, read_status,
    send_token,
};

#[tokio::test]
async fn test_set_password_exchange() {
    let (mut control, mut hmi) = SerialLink::pair();

    let hmi_side = async {
        issue_command(&mut hmi, Command::SetPassword).await?;
        await_token(&mut hmi, ReadyToken::Control).await?;
        hmi.send_buffer(&[1, 2, 3, 4, 5]).await?;
        await_token(&mut hmi, ReadyToken::Control).await?;
        hmi.send_buffer(&[1, 2, 3, 4, 5]).await?;
        let status = hmi.receive_byte().await?;
        Ok::<_, Error>(Status::from_byte_lenient(status))
    };

    let control_side = async {
        await_token(&mut control, ReadyToken::Hmi).await?;
        let command = Command::try_from(control.receive_byte().await?)?;
        send_token(&mut control, ReadyToken::Control).await?;
        let first = control.receive_buffer().await?;
        send_token(&mut control, ReadyToken::Control).await?;
        let second = control.receive_buffer().await?;
        control.send_byte(Status::from(first == second).into()).await?;
        Ok::<_, Error>(command)
    };

    let (status, command) = tokio::try_join!(hmi_side, control_side).unwrap();
    assert_eq!(command, Command::SetPassword);
    assert_eq!(status, Status::Matched);
}

#[tokio::test]
async fn test_check_password_status_after_ready() {
    let (mut control, mut hmi) = SerialLink::pair();

    issue_command(&mut hmi, Command::CheckPassword).await.unwrap();
    await_token(&mut control, ReadyToken::Hmi).await.unwrap();
    assert_eq!(control.receive_byte().await.unwrap(), 0x25);

    send_token(&mut control, ReadyToken::Control).await.unwrap();
    await_token(&mut hmi, ReadyToken::Control).await.unwrap();
    hmi.send_buffer(&[9, 2, 3, 4, 5]).await.unwrap();
    assert_eq!(control.receive_buffer().await.unwrap(), [9, 2, 3, 4, 5]);

    send_token(&mut control, ReadyToken::Control).await.unwrap();
    control.send_byte(Status::Unmatched.into()).await.unwrap();

    await_token(&mut hmi, ReadyToken::Control).await.unwrap();
    assert_eq!(read_status(&mut hmi).await.unwrap(), Status::Unmatched);
}

#[tokio::test]
async fn test_commands_without_payload() {
    let (mut control, mut hmi) = SerialLink::pair();

    issue_command(&mut hmi, Command::UnlockDoor).await.unwrap();
    issue_command(&mut hmi, Command::Alarm).await.unwrap();

    for expected in [Command::UnlockDoor, Command::Alarm] {
        await_token(&mut control, ReadyToken::Hmi).await.unwrap();
        let command = Command::try_from(control.receive_byte().await.unwrap()).unwrap();
        assert_eq!(command, expected);
    }
}

#[tokio::test]
async fn test_link_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut control = SerialLink::new(stream);
        await_token(&mut control, ReadyToken::Hmi).await.unwrap();
        control.receive_byte().await.unwrap()
    });

    let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let mut hmi = SerialLink::new(stream);
    issue_command(&mut hmi, Command::Alarm).await.unwrap();

    assert_eq!(server.await.unwrap(), 0x22);
}
