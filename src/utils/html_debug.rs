// src/utils/html_debug.rs
use std::fs;
use std::path::Path;

use crate::extractors::numbers::{scan, CandidateSpan, SpanKind};
use crate::utils::error::AppError;

/// Renders `text` as a standalone HTML page with every span from
/// [`scan`] highlighted: green for numbers that were extracted, grey
/// strike-through for date spans that were suppressed.
pub fn render_annotated(text: &str) -> String {
    render_spans(text, &scan(text))
}

// `spans` must come from `scan(text)`: offsets are sliced without checks.
fn render_spans(text: &str, spans: &[CandidateSpan<'_>]) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    html.push_str("body { white-space: pre-wrap; font-family: monospace; }\n");
    html.push_str(".number { background-color: #90EE90; }\n");
    html.push_str(".date { background-color: #D3D3D3; text-decoration: line-through; }\n");
    html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    let mut sorted = spans.to_vec();
    sorted.sort_by_key(|span| span.start);

    for span in sorted {
        if span.start < last_pos {
            tracing::warn!("Skipping overlapping span {}..{}", span.start, span.end);
            continue;
        }
        push_escaped(&mut html, &text[last_pos..span.start]);

        html.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            span.kind.as_str(),
            span.start,
            span.end,
            span.kind.as_str()
        ));
        push_escaped(&mut html, span.text);
        html.push_str("</span>");

        last_pos = span.end;
    }

    push_escaped(&mut html, &text[last_pos..]);
    html.push_str("\n</body>\n</html>");
    html
}

/// Scans `text` and writes the annotated page to `path`.
pub fn save_annotated<P: AsRef<Path>>(text: &str, path: P) -> Result<(), AppError> {
    let path = path.as_ref();
    let spans = scan(text);
    let dates = spans.iter().filter(|s| s.kind == SpanKind::Date).count();

    fs::write(path, render_spans(text, &spans))?;

    tracing::info!(
        "Saved annotated HTML to {} ({} spans, {} dates)",
        path.display(),
        spans.len(),
        dates
    );
    Ok(())
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
