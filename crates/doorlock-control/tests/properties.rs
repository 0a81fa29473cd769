//! Property-based tests for the password exchanges.
//!
//! Each case runs a fresh node on a paused current-thread runtime so the
//! store settle delays cost no wall-clock time.

mod common;

use common::*;
use doorlock_core::constants::{PASSWORDS_MATCHED, PASSWORDS_UNMATCHED};
use proptest::prelude::*;

/// Strategy for generating keypad passwords.
fn password() -> impl Strategy<Value = [u8; 5]> {
    prop::array::uniform5(0u8..=9)
}

/// Strategy for generating two different passwords.
fn distinct_pair() -> impl Strategy<Value = ([u8; 5], [u8; 5])> {
    (password(), password()).prop_filter("passwords must differ", |(p, q)| p != q)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .expect("runtime")
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: SetPassword(P, P) stores P and answers MATCHED.
    #[test]
    fn prop_set_password_matching(p in password()) {
        let (status, stored) = block_on(async {
            let mut rig = rig();
            let (dispatch, status) = tokio::join!(
                rig.node.serve_one(),
                hmi_set_password(&mut rig.hmi, p, p)
            );
            dispatch.unwrap();
            (status.unwrap(), rig.store.block(PASSWORD_ADDRESS))
        });

        prop_assert_eq!(status, PASSWORDS_MATCHED);
        prop_assert_eq!(stored, p);
    }

    /// Property: SetPassword(P, Q) with P != Q answers UNMATCHED and leaves
    /// the store as it was.
    #[test]
    fn prop_set_password_mismatch((p, q) in distinct_pair(), previous in password()) {
        let (status, stored, writes) = block_on(async {
            let mut rig = rig_with_password(previous);
            let (dispatch, status) = tokio::join!(
                rig.node.serve_one(),
                hmi_set_password(&mut rig.hmi, p, q)
            );
            dispatch.unwrap();
            (status.unwrap(), rig.store.block(PASSWORD_ADDRESS), rig.store.write_count())
        });

        prop_assert_eq!(status, PASSWORDS_UNMATCHED);
        prop_assert_eq!(stored, previous);
        prop_assert_eq!(writes, 0);
    }

    /// Property: CheckPassword answers MATCHED exactly for the stored
    /// password, reads up to the first differing byte and never writes.
    #[test]
    fn prop_check_password((stored, other) in distinct_pair()) {
        let first_difference = stored
            .iter()
            .zip(other.iter())
            .position(|(a, b)| a != b)
            .unwrap();

        let (ok, denied, reads, writes) = block_on(async {
            let mut rig = rig_with_password(stored);

            let (_, ok) = tokio::join!(
                rig.node.serve_one(),
                hmi_check_password(&mut rig.hmi, stored)
            );
            rig.store.clear_log();

            let (_, denied) = tokio::join!(
                rig.node.serve_one(),
                hmi_check_password(&mut rig.hmi, other)
            );

            (ok.unwrap(), denied.unwrap(), rig.store.read_count(), rig.store.write_count())
        });

        prop_assert_eq!(ok, PASSWORDS_MATCHED);
        prop_assert_eq!(denied, PASSWORDS_UNMATCHED);
        prop_assert_eq!(reads, first_difference + 1);
        prop_assert_eq!(writes, 0);
    }
}
