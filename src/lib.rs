// src/lib.rs
//! Pulls the quantities out of free text ("I need 42 chickens and 7 mice"
//! gives 42 and 7), skipping anything that belongs to a `mm/dd/yyyy` date,
//! and sums them.

pub mod extractors;
pub mod party;
pub mod storage;
pub mod utils;

pub use extractors::{extract, ExtractionResult, MemoizedExtractor, WrappedNumber};
pub use party::{recompute, PartyScope};
pub use utils::AppError;
