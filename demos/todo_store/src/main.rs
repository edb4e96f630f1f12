use crate::todo::{TodoState, load_stats, load_todos, toggle, todo_reducer};
use crate::tracing_setup::tracing_init;
use async_stateful::redux::Store;
use futures_signals::signal::SignalExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
mod todo;
mod tracing_setup;

#[tokio::main]
async fn main() {
    tracing_init();

    let store = Store::new(TodoState::default(), todo_reducer());
    let view = store.clone();
    let watch = tokio::spawn(async move {
        view.to_signal()
            .for_each(|state| async move {
                info!("  View | {}", state.summary());
            })
            .await;
    });

    info!("==========================================");
    warn!("A. Loading takes longer than the grace delay, so SUBMIT is dispatched");
    if let Err(error) = load_todos().submit(400).run(store.clone()).await {
        warn!("  Main | load failed: {error}");
    }

    info!("==========================================");
    warn!("B. Toggling patches the resolved list in place");
    if let Err(error) = store.dispatch(toggle(2)) {
        warn!("  Main | toggle failed: {error}");
    }
    sleep(Duration::from_millis(10)).await;

    info!("==========================================");
    warn!("C. Two refreshes race, only the later one lands");
    let thunks = load_todos();
    let (older, newer) = tokio::join!(thunks.refresh(600).run(store.clone()), async {
        sleep(Duration::from_millis(50)).await;
        thunks.refresh(100).run(store.clone()).await
    });
    info!("  Main | older: {:?}, newer: {:?}", older, newer);

    info!("==========================================");
    warn!("D. Stats are computed quickly from the store, no REQUEST is dispatched");
    match load_stats().submit(()).run(store.clone()).await {
        Ok(outcome) => info!("  Main | stats: {outcome:?}"),
        Err(error) => warn!("  Main | stats failed: {error}"),
    }
    sleep(Duration::from_millis(10)).await;

    watch.abort();
    info!("  Main | Finish");
}
