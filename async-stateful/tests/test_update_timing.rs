mod common;

use async_stateful::{update_state, AsyncCell, AsyncError, StateCell, Status, UpdateOptions};
use common::RecordingCell;
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[tokio::test(start_paused = true)]
async fn test_stale_update_never_overwrites_newer() {
    let cell = RecordingCell::<String>::new(None);

    let older = update_state(
        &cell,
        async {
            sleep(Duration::from_millis(100)).await;
            "older".to_string()
        },
        UpdateOptions::submit(),
    );
    let newer = async {
        sleep(Duration::from_millis(10)).await;
        update_state(
            &cell,
            async {
                sleep(Duration::from_millis(20)).await;
                "newer".to_string()
            },
            UpdateOptions::refresh(),
        )
        .await
    };
    let (older, newer) = tokio::join!(older, newer);

    assert!(newer.is_applied());
    assert!(older.is_superseded());
    assert_eq!(older.state(), newer.state());

    let state = cell.get();
    assert_eq!(state.value(), Some(&"newer".to_string()));
    assert_eq!(state.pending_at(), newer.state().pending_at());
    // submit, refresh, and the newer resolve; the older result is dropped.
    assert_eq!(cell.writes(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_minimum_pending_holds_fast_success() {
    let cell: AsyncCell<String> = AsyncCell::new(None);
    let started = Instant::now();

    let update = tokio::spawn({
        let cell = cell.clone();
        async move {
            update_state(
                &cell,
                async {
                    sleep(Duration::from_millis(10)).await;
                    "quick".to_string()
                },
                UpdateOptions::submit().with_minimum_pending(Duration::from_millis(200)),
            )
            .await
        }
    });

    sleep(Duration::from_millis(100)).await;
    assert!(cell.get().is_pending());

    let outcome = update.await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert!(outcome.is_applied());
    assert_eq!(cell.get().value(), Some(&"quick".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_minimum_pending_does_not_delay_failure() {
    let cell: AsyncCell<String> = AsyncCell::new(None);
    let started = Instant::now();

    let outcome = update_state(
        &cell,
        async {
            sleep(Duration::from_millis(10)).await;
            Err::<String, _>("refused")
        },
        UpdateOptions::submit().with_minimum_pending(Duration::from_millis(200)),
    )
    .await;

    assert!(started.elapsed() < Duration::from_millis(200));
    assert!(outcome.state().is_rejected());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_rejects_and_ignores_late_result() {
    let cell: AsyncCell<String> = AsyncCell::new(None);

    let update = tokio::spawn({
        let cell = cell.clone();
        async move {
            update_state(
                &cell,
                async {
                    sleep(Duration::from_millis(500)).await;
                    "late".to_string()
                },
                UpdateOptions::submit().with_timeout(Duration::from_millis(50)),
            )
            .await
        }
    });

    sleep(Duration::from_millis(60)).await;
    let rejected = cell.get();
    assert_eq!(rejected.status(), Status::Rejected);
    assert_eq!(rejected.error(), Some(&AsyncError::Timeout));

    sleep(Duration::from_millis(600)).await;
    assert_eq!(cell.get(), rejected);
    assert!(update.await.unwrap().is_applied());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_fences_in_flight_update() {
    let cell = RecordingCell::<String>::new(Some("default".to_string()));

    let update = update_state(
        &cell,
        async {
            sleep(Duration::from_millis(100)).await;
            "finished".to_string()
        },
        UpdateOptions::submit(),
    );
    let cancel = async {
        sleep(Duration::from_millis(10)).await;
        cell.replace(|state| state.cancel())
    };
    let (outcome, cancelled) = tokio::join!(update, cancel);

    assert!(outcome.is_superseded());
    assert_eq!(outcome.state(), &cancelled);
    assert!(cell.get().is_cancelled());
    assert_eq!(cell.get().value(), Some(&"default".to_string()));
    assert_eq!(cell.writes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reset_fences_in_flight_update() {
    let cell: AsyncCell<u32> = AsyncCell::new(None);

    let update = update_state(
        &cell,
        async {
            sleep(Duration::from_millis(100)).await;
            1_u32
        },
        UpdateOptions::submit(),
    );
    let reset = async {
        sleep(Duration::from_millis(10)).await;
        cell.replace(|state| state.reset());
    };
    let (outcome, ()) = tokio::join!(update, reset);

    assert!(outcome.is_superseded());
    assert!(cell.get().is_pristine());
    assert_eq!(cell.get().value(), None);
}
