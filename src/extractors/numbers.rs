// src/extractors/numbers.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// --- Constants ---
/// Currency symbols accepted as a prefix of a numeric span. They only mark the
/// span as numeric and are stripped before parsing.
pub const CURRENCY_SYMBOLS: [char; 3] = ['$', '£', '€'];

// --- Regex Patterns (Lazy Static) ---
// Month/day/year, slash-delimited. Purely syntactic: 13/45/9999 is still a date.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}").expect("Failed to compile DATE_RE")
});

// Optional currency, optional sign, digits with comma groups, optional
// fraction. Groups longer than 3 digits are cut off by `grouped_len`.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[$£€]?-?[0-9]+(?:,[0-9]+)*(?:\.[0-9]+)?")
        .expect("Failed to compile NUMBER_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Number,
    Date,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Number => "number",
            SpanKind::Date => "date",
        }
    }
}

/// A substring matched by the token grammar, with byte offsets into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
    pub kind: SpanKind,
}

/// A single extracted value boxed in its own record, so list renderers get one
/// item per value rather than a bare primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WrappedNumber {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub numbers: Vec<f64>,
    pub wrapped: Vec<WrappedNumber>,
    pub total: f64,
}

impl ExtractionResult {
    /// Builds the wrapped records and the total from an ordered value list.
    pub fn from_numbers(numbers: Vec<f64>) -> Self {
        let wrapped = numbers.iter().copied().map(wrap).collect();
        let total = sum(&numbers);
        Self { numbers, wrapped, total }
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

// --- Extraction ---

/// Extracts every quantity from free text, in order of appearance, skipping
/// anything that is part of a `mm/dd/yy(yy)` date.
///
/// Never fails: text that does not parse as a number is simply not emitted.
pub fn extract(text: &str) -> ExtractionResult {
    let numbers: Vec<f64> = scan(text)
        .into_iter()
        .filter(|span| span.kind == SpanKind::Number)
        .filter_map(|span| {
            let value = parse_span(span.text);
            if value.is_none() {
                tracing::trace!("Dropping unparseable span '{}' at {}..{}", span.text, span.start, span.end);
            }
            value
        })
        .collect();

    tracing::trace!("Extracted {} numbers from {} bytes of text", numbers.len(), text.len());
    ExtractionResult::from_numbers(numbers)
}

/// Tokenizes `text` into non-overlapping spans, dates included, ordered by
/// start offset.
///
/// Dates are located first over the whole input; numeric spans are then only
/// searched for in the gaps between dates, so a date always wins over any
/// number that would overlap it.
pub fn scan(text: &str) -> Vec<CandidateSpan<'_>> {
    let mut spans = Vec::new();
    let mut last_end = 0;

    for date in DATE_RE.find_iter(text) {
        push_numbers(text, last_end, date.start(), &mut spans);
        spans.push(CandidateSpan {
            start: date.start(),
            end: date.end(),
            text: date.as_str(),
            kind: SpanKind::Date,
        });
        last_end = date.end();
    }
    push_numbers(text, last_end, text.len(), &mut spans);

    spans
}

fn push_numbers<'a>(text: &'a str, from: usize, to: usize, spans: &mut Vec<CandidateSpan<'a>>) {
    if from >= to {
        return;
    }
    // Date matches are pure ASCII, so the gap bounds are char boundaries.
    let gap = &text[from..to];
    let mut pos = 0;

    // Resume right after the kept part, so a rejected group is scanned again
    // as a number of its own.
    while let Some(m) = NUMBER_RE.find_at(gap, pos) {
        let end = m.start() + grouped_len(m.as_str());
        spans.push(CandidateSpan {
            start: from + m.start(),
            end: from + end,
            text: &gap[m.start()..end],
            kind: SpanKind::Number,
        });
        pos = end;
    }
}

/// Byte length of the longest prefix of a `NUMBER_RE` match whose comma groups
/// are all 1-3 digits. The fraction is only kept when every group is valid.
fn grouped_len(span: &str) -> usize {
    let Some(first_comma) = span.find(',') else {
        return span.len();
    };

    let mut end = first_comma;
    let mut rest = &span[first_comma..];
    while let Some(after_comma) = rest.strip_prefix(',') {
        let digits = after_comma.bytes().take_while(u8::is_ascii_digit).count();
        if !(1..=3).contains(&digits) {
            return end;
        }
        end += 1 + digits;
        rest = &after_comma[digits..];
    }
    span.len()
}

/// Normalizes one numeric span: drops a leading currency symbol and the comma
/// separators, then parses sign, integer and fraction.
///
/// Returns `None` for anything outside the numeric grammar's alphabet and for
/// values that overflow to infinity.
pub fn parse_span(span: &str) -> Option<f64> {
    let unprefixed = span
        .strip_prefix(|c: char| CURRENCY_SYMBOLS.contains(&c))
        .unwrap_or(span);
    let normalized: String = unprefixed.chars().filter(|c| *c != ',').collect();

    if !normalized
        .bytes()
        .all(|b| b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return None;
    }

    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Arithmetic sum; 0 for an empty slice.
pub fn sum(numbers: &[f64]) -> f64 {
    numbers.iter().fold(0.0, |acc, n| acc + n)
}

pub fn wrap(value: f64) -> WrappedNumber {
    WrappedNumber { value }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", vec![])]
    #[case::single("42", vec![42.0])]
    #[case::space_separated("42 15 666", vec![42.0, 15.0, 666.0])]
    #[case::zeros("0 0 79", vec![0.0, 0.0, 79.0])]
    #[case::mixed_whitespace("   \t\n26\t\r32\n", vec![26.0, 32.0])]
    #[case::negative("-42", vec![-42.0])]
    #[case::decimal("42.15 666", vec![42.15, 666.0])]
    #[case::negative_zero("0 -0 -79", vec![0.0, 0.0, -79.0])]
    #[case::negative_decimals("   \t\n-26.987\t\r32.005\n", vec![-26.987, 32.005])]
    #[case::dollar("$42", vec![42.0])]
    #[case::currencies("$42.15 $666 £92", vec![42.15, 666.0, 92.0])]
    #[case::euro_zero("€0", vec![0.0])]
    #[case::no_grouping("1484.57", vec![1484.57])]
    #[case::grouping("123,456.57", vec![123456.57])]
    #[case::date("12/31/1984", vec![])]
    #[case::flanked_date("6 09/20/78 17", vec![6.0, 17.0])]
    #[case::prose("I need 42 chickens and 7 mice", vec![42.0, 7.0])]
    fn extracts_expected_numbers(#[case] input: &str, #[case] expected: Vec<f64>) {
        let result = extract(input);
        assert_eq!(result.numbers, expected, "input: {:?}", input);
    }

    #[test]
    fn test_empty_input_has_zero_total() {
        let result = extract("");
        assert!(result.numbers.is_empty());
        assert!(result.wrapped.is_empty());
        assert_eq!(result.total, 0.0);
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        let result = extract("-0");
        assert_eq!(result.numbers, vec![0.0]);
        assert!(result.numbers[0].is_sign_negative());
    }

    #[test]
    fn test_prose_wraps_and_totals() {
        let result = extract("I need 42 chickens and 7 mice");
        assert_eq!(result.wrapped[0].value, 42.0);
        assert_eq!(result.wrapped[1].value, 7.0);
        assert_eq!(result.total, 49.0);
    }

    #[test]
    fn test_sum_and_wrap() {
        assert_eq!(sum(&[21.0, 21.0]), 42.0);
        assert_eq!(sum(&[]), 0.0);
        assert_eq!(wrap(42.0).value, 42.0);
    }

    #[rstest]
    #[case::bare_currency("$ £ €", vec![])]
    #[case::currency_then_space("$ 5", vec![5.0])]
    #[case::trailing_comma("7, 8", vec![7.0, 8.0])]
    #[case::long_comma_group("1,2345", vec![1.0, 2345.0])]
    #[case::multiple_groups("1,234,567", vec![1234567.0])]
    #[case::two_points("1.2.3", vec![1.2, 3.0])]
    #[case::calendar_invalid_date("13/45/9999", vec![])]
    #[case::date_in_currency("$12/31/1984 total 5", vec![5.0])]
    #[case::short_year_not_date("1/2/3", vec![1.0, 2.0, 3.0])]
    #[case::adjacent_to_words("abc12def", vec![12.0])]
    #[case::grouped_before_unit("1,234kg", vec![1234.0])]
    #[case::grouped_before_currency_code("$1,000USD", vec![1000.0])]
    #[case::euro_grouped_before_code("€2,500EUR", vec![2500.0])]
    #[case::grouped_before_underscore("12,345_total", vec![12345.0])]
    #[case::long_trailing_group("12,345,6789", vec![12345.0, 6789.0])]
    #[case::long_group_drops_fraction("1,2345.5", vec![1.0, 2345.5])]
    fn handles_edge_cases(#[case] input: &str, #[case] expected: Vec<f64>) {
        assert_eq!(extract(input).numbers, expected, "input: {:?}", input);
    }

    #[test]
    fn test_scan_reports_dates_and_offsets() {
        let spans = scan("6 09/20/78 17");
        let kinds: Vec<_> = spans.iter().map(|s| (s.kind, s.text, s.start, s.end)).collect();
        assert_eq!(
            kinds,
            vec![
                (SpanKind::Number, "6", 0, 1),
                (SpanKind::Date, "09/20/78", 2, 10),
                (SpanKind::Number, "17", 11, 13),
            ]
        );
    }

    #[test]
    fn test_scan_offsets_with_multibyte_currency() {
        let text = "£92 and €3";
        let spans = scan(text);
        assert_eq!(spans.len(), 2);
        for span in &spans {
            assert_eq!(&text[span.start..span.end], span.text);
        }
        assert_eq!(spans[0].text, "£92");
        assert_eq!(spans[1].text, "€3");
    }

    #[test]
    fn test_parse_span_rejects_foreign_input() {
        assert_eq!(parse_span("$1,000.50"), Some(1000.5));
        assert_eq!(parse_span("$"), None);
        assert_eq!(parse_span("1e5"), None);
        assert_eq!(parse_span("inf"), None);
        assert_eq!(parse_span(""), None);
    }

    #[test]
    fn test_overflowing_digit_run_is_skipped() {
        let huge = "9".repeat(400);
        let result = extract(&format!("1 {} 2", huge));
        assert_eq!(result.numbers, vec![1.0, 2.0]);
    }

    proptest! {
        #[test]
        fn prop_extract_is_idempotent(text in "[0-9 $£€,./a-z\\-\t\n]{0,60}") {
            prop_assert_eq!(extract(&text), extract(&text));
        }

        #[test]
        fn prop_wrapped_matches_numbers(text in "[0-9 $£€,./a-z\\-\t\n]{0,60}") {
            let result = extract(&text);
            prop_assert_eq!(result.wrapped.len(), result.numbers.len());
            for (wrapped, number) in result.wrapped.iter().zip(&result.numbers) {
                prop_assert_eq!(wrapped.value, *number);
            }
            prop_assert_eq!(result.total, sum(&result.numbers));
        }

        #[test]
        fn prop_spans_are_ordered_and_disjoint(text in "[0-9 $£€,./a-z\\-\t\n]{0,60}") {
            let spans = scan(&text);
            for pair in spans.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
            let from_spans: Vec<f64> = spans
                .iter()
                .filter(|s| s.kind == SpanKind::Number)
                .filter_map(|s| parse_span(s.text))
                .collect();
            prop_assert_eq!(extract(&text).numbers, from_spans);
        }

        #[test]
        fn prop_space_separated_integers_survive(values in proptest::collection::vec(-99_999i64..99_999, 0..12)) {
            let text = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
            let expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();
            prop_assert_eq!(extract(&text).numbers, expected);
        }
    }
}
