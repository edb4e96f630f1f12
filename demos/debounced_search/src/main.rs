use crate::tracing_setup::tracing_init;
use async_stateful::{AsyncCell, Debounced, StateCell, UpdateOptions};
use futures_signals::signal::SignalExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
mod tracing_setup;

const LANGUAGES: [&str; 8] = [
    "rust", "ruby", "racket", "python", "perl", "go", "haskell", "zig",
];

#[tokio::main]
async fn main() {
    tracing_init();

    let results: AsyncCell<Vec<String>> = AsyncCell::new(Some(Vec::new()));
    let search = Debounced::new(results.clone(), Duration::from_millis(300));

    let watcher = results.clone();
    let watch = tokio::spawn(async move {
        watcher
            .to_signal()
            .for_each(|state| async move {
                let matches = state.lens(|found| found.len(), 0);
                info!(
                    "  View | {:<10} matches: {} shown: {:?}",
                    matches.status,
                    matches.value,
                    state.value().cloned().unwrap_or_default()
                );
            })
            .await;
    });

    warn!("Typing \"ru\" one key at a time, only the last query runs");
    let mut handles = Vec::new();
    for query in ["r", "ru"] {
        debug!("Input | {query}");
        handles.push(search.call(move || find(query), UpdateOptions::refresh()));
        sleep(Duration::from_millis(100)).await;
    }
    for handle in handles {
        match handle.await {
            Ok(Some(outcome)) => info!("  Main | applied: {}", outcome.is_applied()),
            Ok(None) => info!("  Main | replaced before it fired"),
            Err(error) => warn!("  Main | search task failed: {error}"),
        }
    }

    warn!("A pending search is dropped by cancel");
    let dropped = search.call(move || find("py"), UpdateOptions::refresh());
    search.cancel();
    if let Ok(None) = dropped.await {
        info!("  Main | cancelled, still showing {:?}", results.get().value());
    }

    watch.abort();
    info!("  Main | Finish");
}

async fn find(query: &'static str) -> Result<Vec<String>, String> {
    sleep(Duration::from_millis(150)).await;
    if query.is_empty() {
        return Err("empty query".to_string());
    }
    Ok(LANGUAGES
        .iter()
        .filter(|language| language.starts_with(query))
        .map(|language| language.to_string())
        .collect())
}
