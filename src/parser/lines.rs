use std::sync::LazyLock;

use regex::Regex;

// Anything outside word chars, whitespace, the anchor punctuation and Latin-1 letters.
static NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s@.,\-+()\tÀ-ÖØ-öø-ÿ]").unwrap());
static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\r\n]+").unwrap());
static BREAKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[\r\n]\s*").unwrap());
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Replaces symbol noise with spaces and collapses whitespace.
///
/// Runs of horizontal whitespace (tabs included) become one space; any run that
/// contains a line break becomes a single `\n`, so row structure survives.
/// Idempotent, and never fails. [`segment_lines`] applies the same cleanup one
/// source line at a time.
pub fn normalize(raw: &str) -> String {
    let cleaned = NOISE_RE.replace_all(raw, " ");
    let cleaned = BREAKS_RE.replace_all(&cleaned, "\n");
    let cleaned = HSPACE_RE.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

/// A normalized, non-empty line of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the raw text.
    pub number: usize,
    pub text: String,
    /// Long enough to hold a record.
    pub candidate: bool,
}

/// Raw lines, split on `\r\n`, `\r` or `\n` (each counts as one break).
pub fn raw_lines(raw: &str) -> impl Iterator<Item = &str> {
    LINE_BREAK_RE.split(raw)
}

/// Lazily normalizes `raw` line by line. Lines that clean up to nothing are
/// skipped; the rest are marked as candidates when their length exceeds
/// `min_chars` characters.
pub fn segment_lines(raw: &str, min_chars: usize) -> impl Iterator<Item = SourceLine> + '_ {
    raw_lines(raw).enumerate().filter_map(move |(i, line)| {
        let text = normalize(line);
        if text.is_empty() {
            return None;
        }
        let candidate = is_long_enough(&text, min_chars);
        Some(SourceLine {
            number: i + 1,
            text,
            candidate,
        })
    })
}

fn is_long_enough(line: &str, min_chars: usize) -> bool {
    line.chars().count() > min_chars
}
