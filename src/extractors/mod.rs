// src/extractors/mod.rs
pub mod memo;
pub mod numbers;

// Re-export key extraction types for convenience
pub use memo::MemoizedExtractor;
pub use numbers::{
    extract,
    parse_span,
    scan,
    sum,
    wrap,
    CandidateSpan,
    ExtractionResult,
    SpanKind,
    WrappedNumber,
};
