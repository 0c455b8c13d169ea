// src/party/mod.rs
pub mod throttle;

use serde::Serialize;

use crate::extractors::{extract, ExtractionResult, WrappedNumber};

pub use throttle::{run_throttled, DEFAULT_INTERVAL};

/// Presentation state for the sum page: the text the user typed plus the
/// fields derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartyScope {
    pub raw_text: String,
    pub numbers: Vec<f64>,
    pub wrapped_numbers: Vec<WrappedNumber>,
    pub total: f64,
}

impl PartyScope {
    pub fn new(raw_text: impl Into<String>) -> Self {
        let mut scope = Self {
            raw_text: raw_text.into(),
            ..Self::default()
        };
        scope.recompute();
        scope
    }

    /// Replaces the input and refreshes every derived field.
    pub fn set_raw_text(&mut self, raw_text: impl Into<String>) {
        self.raw_text = raw_text.into();
        self.recompute();
    }

    /// Re-derives `numbers`, `wrapped_numbers` and `total` from `raw_text`.
    pub fn recompute(&mut self) {
        let ExtractionResult { numbers, wrapped, total } = extract(&self.raw_text);
        self.numbers = numbers;
        self.wrapped_numbers = wrapped;
        self.total = total;
        tracing::debug!("Recomputed scope: {} numbers, total {}", self.numbers.len(), self.total);
    }

    /// Snapshot of the derived fields.
    pub fn result(&self) -> ExtractionResult {
        ExtractionResult {
            numbers: self.numbers.clone(),
            wrapped: self.wrapped_numbers.clone(),
            total: self.total,
        }
    }
}

pub fn recompute(scope: &mut PartyScope) {
    scope.recompute();
}
