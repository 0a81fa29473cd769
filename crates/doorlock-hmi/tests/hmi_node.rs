//! HMI node behavior against a scripted Control peer.

mod common;

use std::time::Duration;

use common::*;
use doorlock_core::Error;
use doorlock_core::constants::{ALARM, CHECK_PASSWORD, SET_PASSWORD, UNLOCK_DOOR};
use doorlock_hardware::KeypadKey;
use doorlock_hardware::mock::LcdOp;
use doorlock_hmi::screen::{DOOR_LOCKING, DOOR_UNLOCKING, ENTER_PASSWORD};
use doorlock_hmi::{HmiState, MenuOutcome};
use doorlock_protocol::{Channel, ReadyToken, Status, send_token};
use tokio::time::{self, Instant};

#[tokio::test(start_paused = true)]
async fn test_provisioning_sends_both_entries() {
    let mut rig = rig();
    let started = Instant::now();

    provision(&mut rig, [1, 2, 3, 4, 5]).await;

    assert_eq!(rig.node.state(), HmiState::MainMenu);
    // Twelve key presses, each followed by the key guard.
    assert_eq!(started.elapsed(), Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_provisioning_retries_until_matched() {
    let mut rig = rig();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 6]).await.unwrap();
    rig.keys.send_password(&[8, 8, 8, 8, 8]).await.unwrap();
    rig.keys.send_password(&[8, 8, 8, 8, 8]).await.unwrap();

    let control = &mut rig.control;
    let (rounds, entries) = tokio::join!(rig.node.provision(), async {
        let first = control_serve_set(control, Status::Unmatched).await?;
        let second = control_serve_set(control, Status::Matched).await?;
        Ok::<_, doorlock_core::Error>((first, second))
    });

    assert_eq!(rounds.unwrap(), 2);
    let (first, second) = entries.unwrap();
    assert_eq!(first, ([1, 2, 3, 4, 5], [1, 2, 3, 4, 6]));
    assert_eq!(second, ([8; 5], [8; 5]));
    assert_eq!(rig.node.state(), HmiState::MainMenu);
}

#[tokio::test(start_paused = true)]
async fn test_entry_restarts_without_confirm() {
    let mut rig = rig();
    rig.keys.send_str("12345+").await.unwrap();
    rig.keys.send_str("54321=").await.unwrap();
    rig.keys.send_str("54321=").await.unwrap();

    let (rounds, entries) = tokio::join!(
        rig.node.provision(),
        control_serve_set(&mut rig.control, Status::Matched)
    );

    assert_eq!(rounds.unwrap(), 1);
    assert_eq!(entries.unwrap(), ([5, 4, 3, 2, 1], [5, 4, 3, 2, 1]));
    let prompts = rig.lcd.texts().iter().filter(|t| *t == ENTER_PASSWORD).count();
    assert_eq!(prompts, 2);
}

#[tokio::test(start_paused = true)]
async fn test_non_digit_keys_do_not_fill_slots() {
    let mut rig = rig();
    let started = Instant::now();
    rig.keys.send_str("1+2c3-4*5=").await.unwrap();
    rig.keys.send_str("12345=").await.unwrap();

    let (rounds, entries) = tokio::join!(
        rig.node.provision(),
        control_serve_set(&mut rig.control, Status::Matched)
    );

    rounds.unwrap();
    assert_eq!(entries.unwrap(), ([1, 2, 3, 4, 5], [1, 2, 3, 4, 5]));

    let masks = rig
        .lcd
        .events()
        .iter()
        .filter(|event| event.op == LcdOp::Char('*'))
        .count();
    assert_eq!(masks, 10);
    // Ignored keys still pay the key guard.
    assert_eq!(started.elapsed(), Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn test_other_key_redraws_menu() {
    let mut rig = rig();
    provision(&mut rig, [1, 2, 3, 4, 5]).await;
    rig.keys.send_key(KeypadKey::Digit(7)).await.unwrap();

    let outcome = rig.node.menu_cycle().await.unwrap();

    assert_eq!(outcome, MenuOutcome::Redrawn);
    assert_eq!(rig.lcd.snapshot(), "+ : Open Door|- : Change Pass");
    assert_eq!(rig.node.state(), HmiState::MainMenu);
}

#[tokio::test(start_paused = true)]
async fn test_open_door_screen_follows_phases() {
    let mut rig = rig();
    provision(&mut rig, [1, 2, 3, 4, 5]).await;
    rig.keys.send_key(KeypadKey::Plus).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();

    let control = &mut rig.control;
    let (outcome, command) = tokio::join!(rig.node.menu_cycle(), async {
        let candidate = control_serve_check(control, Status::Matched).await?;
        assert_eq!(candidate, [1, 2, 3, 4, 5]);
        control_next_command(control).await
    });

    assert_eq!(outcome.unwrap(), MenuOutcome::DoorUnlocked);
    assert_eq!(command.unwrap(), UNLOCK_DOOR);
    assert_eq!(rig.node.state(), HmiState::MainMenu);

    let events = rig.lcd.events();
    let start = events
        .iter()
        .position(|e| matches!(&e.op, LcdOp::Text { text, .. } if text == DOOR_UNLOCKING))
        .unwrap();
    let shown: Vec<_> = events[start..]
        .iter()
        .map(|e| (e.op.clone(), e.at - events[start].at))
        .collect();
    assert_eq!(
        shown,
        vec![
            (
                LcdOp::Text {
                    row: 0,
                    col: 0,
                    text: DOOR_UNLOCKING.to_string()
                },
                Duration::ZERO
            ),
            (LcdOp::Clear, Duration::from_secs(15)),
            (
                LcdOp::Text {
                    row: 0,
                    col: 0,
                    text: DOOR_LOCKING.to_string()
                },
                Duration::from_secs(18)
            ),
        ]
    );
    assert_eq!(
        Instant::now() - events[start].at,
        Duration::from_secs(33)
    );
}

#[tokio::test(start_paused = true)]
async fn test_wrong_passwords_raise_alarm() {
    let mut rig = rig();
    provision(&mut rig, [1, 2, 3, 4, 5]).await;
    let Rig {
        mut node,
        mut control,
        keys,
        lcd,
    } = rig;

    keys.send_key(KeypadKey::Plus).await.unwrap();
    for _ in 0..3 {
        keys.send_password(&[9, 9, 9, 9, 9]).await.unwrap();
    }

    let script = async {
        for _ in 0..3 {
            control_serve_check(&mut control, Status::Unmatched).await.unwrap();
        }
        assert_eq!(control_next_command(&mut control).await.unwrap(), ALARM);
        assert_eq!(lcd.snapshot(), "ERROR|");

        // Keypad is locked for the whole alarm phase.
        assert!(!keys.send_key(KeypadKey::Digit(1)).await.unwrap());
        time::sleep(Duration::from_secs(59)).await;
        assert!(!keys.send_key(KeypadKey::Digit(2)).await.unwrap());
        time::sleep(Duration::from_secs(2)).await;
        assert!(keys.send_key(KeypadKey::Digit(3)).await.unwrap());
    };

    let (outcome, ()) = tokio::join!(node.menu_cycle(), script);

    assert_eq!(outcome.unwrap(), MenuOutcome::AlarmRaised);
    assert_eq!(node.state(), HmiState::MainMenu);
    assert!(node.session().visited().contains(&HmiState::Alarm));
    assert!(!node.session().visited().contains(&HmiState::DoorUnlocking));
}

#[tokio::test(start_paused = true)]
async fn test_second_attempt_opens_door() {
    let mut rig = rig();
    provision(&mut rig, [1, 2, 3, 4, 5]).await;
    rig.keys.send_key(KeypadKey::Plus).await.unwrap();
    rig.keys.send_password(&[5, 4, 3, 2, 1]).await.unwrap();
    rig.keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();

    let control = &mut rig.control;
    let (outcome, command) = tokio::join!(rig.node.menu_cycle(), async {
        control_serve_check(control, Status::Unmatched).await?;
        control_serve_check(control, Status::Matched).await?;
        control_next_command(control).await
    });

    assert_eq!(outcome.unwrap(), MenuOutcome::DoorUnlocked);
    assert_eq!(command.unwrap(), UNLOCK_DOOR);
}

#[tokio::test(start_paused = true)]
async fn test_change_password() {
    let mut rig = rig();
    provision(&mut rig, [1, 2, 3, 4, 5]).await;
    rig.keys.send_key(KeypadKey::Minus).await.unwrap();
    rig.keys.send_password(&[2, 4, 6, 8, 0]).await.unwrap();
    rig.keys.send_password(&[2, 4, 6, 8, 0]).await.unwrap();

    let (outcome, entries) = tokio::join!(
        rig.node.menu_cycle(),
        control_serve_set(&mut rig.control, Status::Matched)
    );

    assert_eq!(outcome.unwrap(), MenuOutcome::PasswordChanged);
    assert_eq!(entries.unwrap(), ([2, 4, 6, 8, 0], [2, 4, 6, 8, 0]));
    assert_eq!(rig.node.state(), HmiState::MainMenu);
}

#[tokio::test(start_paused = true)]
async fn test_change_password_failures_raise_alarm() {
    let mut rig = rig();
    provision(&mut rig, [1, 2, 3, 4, 5]).await;
    rig.keys.send_key(KeypadKey::Minus).await.unwrap();
    for _ in 0..3 {
        rig.keys.send_password(&[1, 1, 1, 1, 1]).await.unwrap();
        rig.keys.send_password(&[2, 2, 2, 2, 2]).await.unwrap();
    }

    let control = &mut rig.control;
    let (outcome, command) = tokio::join!(rig.node.menu_cycle(), async {
        for _ in 0..3 {
            control_serve_set(control, Status::Unmatched).await?;
        }
        control_next_command(control).await
    });

    assert_eq!(outcome.unwrap(), MenuOutcome::AlarmRaised);
    assert_eq!(command.unwrap(), ALARM);
    assert_eq!(rig.node.state(), HmiState::MainMenu);
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_when_link_closes() {
    let Rig {
        mut node,
        mut control,
        keys,
        ..
    } = rig();
    keys.send_password(&[3; 5]).await.unwrap();
    keys.send_password(&[3; 5]).await.unwrap();

    // Play SetPassword up to the status byte, then hang up.
    let script = async move {
        assert_eq!(control_next_command(&mut control).await.unwrap(), SET_PASSWORD);
        for _ in 0..2 {
            send_token(&mut control, ReadyToken::Control).await.unwrap();
            assert_eq!(control.receive_buffer().await.unwrap(), [3; 5]);
        }
        drop(control);
    };

    let (result, ()) = tokio::join!(node.run(), script);

    result.unwrap();
    assert_eq!(node.state(), HmiState::Provisioning);
}

#[tokio::test(start_paused = true)]
async fn test_failed_unlock_attempt_returns_to_menu() {
    let mut rig = rig();
    provision(&mut rig, [1, 2, 3, 4, 5]).await;
    let Rig {
        mut node,
        control,
        keys,
        lcd,
    } = rig;

    keys.send_key(KeypadKey::Plus).await.unwrap();
    keys.send_password(&[1, 2, 3, 4, 5]).await.unwrap();

    // Take the command, then hang up before answering.
    let script = async move {
        let mut control = control;
        assert_eq!(control_next_command(&mut control).await.unwrap(), CHECK_PASSWORD);
    };
    let (result, ()) = tokio::join!(node.menu_cycle(), script);

    assert!(matches!(result, Err(Error::LinkClosed)));
    assert_eq!(node.state(), HmiState::MainMenu);

    // The session accepts the next cycle.
    keys.send_key(KeypadKey::Digit(7)).await.unwrap();
    assert_eq!(node.menu_cycle().await.unwrap(), MenuOutcome::Redrawn);
    assert_eq!(lcd.snapshot(), "+ : Open Door|- : Change Pass");
}

#[tokio::test(start_paused = true)]
async fn test_keypad_loss_during_change_returns_to_menu() {
    let mut rig = rig();
    provision(&mut rig, [1, 2, 3, 4, 5]).await;

    rig.keys.send_key(KeypadKey::Minus).await.unwrap();
    rig.keys.send_digits(&[4, 2]).await.unwrap();
    let Rig { mut node, keys, .. } = rig;
    drop(keys);

    let result = node.menu_cycle().await;

    assert!(matches!(result, Err(Error::Hardware { .. })));
    assert_eq!(node.state(), HmiState::MainMenu);
    let visited = node.session().visited();
    assert_eq!(
        &visited[visited.len() - 3..],
        &[HmiState::MainMenu, HmiState::ChangePassword, HmiState::MainMenu]
    );
}
