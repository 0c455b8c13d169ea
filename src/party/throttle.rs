// src/party/throttle.rs
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::extractors::ExtractionResult;
use crate::party::PartyScope;

/// Minimum spacing between two recomputes driven by a change stream.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);

/// Drives [`PartyScope::recompute`] from a stream of `raw_text` changes.
///
/// The first change after an idle period is recomputed right away. Changes
/// arriving within `interval` of the previous recompute wait for the interval
/// to elapse, and then only the latest text is recomputed; intermediate values
/// are dropped. Every recompute result is sent on `results`.
///
/// Returns once the watch sender is gone and its last value has been handled,
/// or once nobody listens on `results` anymore.
pub async fn run_throttled(
    mut raw_text: watch::Receiver<String>,
    interval: Duration,
    results: mpsc::UnboundedSender<ExtractionResult>,
) {
    let mut scope = PartyScope::default();
    let mut last_run: Option<Instant> = None;

    while raw_text.changed().await.is_ok() {
        if let Some(last) = last_run {
            tokio::time::sleep_until(last + interval).await;
        }

        let latest = raw_text.borrow_and_update().clone();
        scope.set_raw_text(latest);
        last_run = Some(Instant::now());

        if results.send(scope.result()).is_err() {
            tracing::debug!("Result receiver dropped, stopping throttled recompute");
            return;
        }
    }

    tracing::debug!("Raw text stream closed, stopping throttled recompute");
}
