use crate::tracing_setup::tracing_init;
use async_stateful::{update_state, AsyncCell, MatchCases, UpdateOptions};
use futures_signals::signal::SignalExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
mod tracing_setup;

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("A. A fast update is held pending for at least 500ms");

    let cell: AsyncCell<u64> = AsyncCell::new(Some(0));
    let worker = cell.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(200)).await;
        let outcome = update_state(
            &worker,
            heavy_computation(1_000),
            UpdateOptions::submit().with_minimum_pending(Duration::from_millis(500)),
        )
        .await;
        debug!("Worker | outcome: {:?}", outcome.state().status());
    });
    cell.to_signal()
        .stop_if(|state| state.is_settled())
        .for_each(|state| async move {
            info!("  Main | show state: {}", render(&state));
        })
        .await;

    info!("==========================================");
    warn!("B. A slow update times out and keeps the default value");

    let cell: AsyncCell<u64> = AsyncCell::new(Some(0));
    let worker = cell.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(200)).await;
        update_state(
            &worker,
            heavy_computation(100_000_000),
            UpdateOptions::submit().with_timeout(Duration::from_millis(10)),
        )
        .await;
    });
    cell.to_signal()
        .stop_if(|state| state.is_settled())
        .for_each(|state| async move {
            info!("  Main | show state: {}", render(&state));
        })
        .await;

    info!("==========================================");
    info!("  Main | Finish");
}

fn render(state: &async_stateful::AsyncState<u64>) -> String {
    let value = state.value().copied().unwrap_or_default();
    state.match_status(
        MatchCases::new()
            .pristine_with(|| format!("idle ({value})"))
            .submitting_with(|| format!("working ({value})"))
            .resolved_with(|sum| format!("done, sum = {sum}"))
            .rejected_with(|error| format!("failed: {error}, showing {value}")),
        String::from("unknown"),
    )
}

async fn heavy_computation(count: u64) -> u64 {
    let mut i: u64 = 0;
    for _ in 0..count {
        if i % 1_000_000 == 0 {
            tokio::task::yield_now().await;
        }
        i += 1;
    }
    i
}
