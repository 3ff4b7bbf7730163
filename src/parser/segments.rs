use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Brazilian phone shape: `(11) 98888-7777`, `21 3333 4444`, `11988887777`,
/// optionally behind a `+55` country code. `number` is the national part.
pub static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?55\s?)?(?P<number>\(?[0-9]{2}\)?\s?[0-9]{4,5}[-\s]?[0-9]{4})").unwrap()
});

/// One phone match: the whole span (country code included) and the national number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneAnchor {
    pub span: Range<usize>,
    pub number: Range<usize>,
}

/// Phone anchors in `text`, left to right, never overlapping.
///
/// A match with an ASCII digit directly before or after it is part of a longer
/// number; it is dropped and the search resumes one byte further on.
pub fn find_phones(text: &str) -> Vec<PhoneAnchor> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = PHONE_RE.captures_at(text, pos) else {
            break;
        };
        let (Some(whole), Some(number)) = (caps.get(0), caps.name("number")) else {
            break;
        };
        if touches_digit(text, whole.range()) {
            // matches start with '+', '(' or a digit, all one byte wide
            pos = whole.start() + 1;
            continue;
        }
        found.push(PhoneAnchor {
            span: whole.range(),
            number: number.range(),
        });
        pos = whole.end();
    }

    found
}

fn touches_digit(text: &str, span: Range<usize>) -> bool {
    let bytes = text.as_bytes();
    let before = span.start > 0 && bytes[span.start - 1].is_ascii_digit();
    let after = bytes.get(span.end).is_some_and(u8::is_ascii_digit);
    before || after
}

/// The slice of a line attributed to one client, with the phone anchor that closes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSegment<'a> {
    pub text: &'a str,
    /// Byte offset of `text` within its line.
    pub start: usize,
    /// Byte range of the whole anchor within `text`.
    pub anchor: Range<usize>,
    /// Byte range of the national number within `text`.
    pub phone: Range<usize>,
}

impl<'a> ClientSegment<'a> {
    pub fn phone_text(&self) -> &'a str {
        &self.text[self.phone.clone()]
    }

    /// Everything before the phone anchor.
    pub fn before_phone(&self) -> &'a str {
        &self.text[..self.anchor.start]
    }
}

/// Splits a line into one segment per phone anchor.
///
/// Segment `i` runs from the end of anchor `i - 1` (or the line start) to the
/// end of anchor `i`, so text sitting between two phones belongs to the later
/// anchor's client. The last segment also keeps whatever trails its anchor up
/// to the end of the line. No anchors means no segments.
pub fn split_segments(line: &str) -> Vec<ClientSegment<'_>> {
    let anchors = find_phones(line);
    let mut segments = Vec::with_capacity(anchors.len());
    let mut start = 0;

    for (i, anchor) in anchors.iter().enumerate() {
        let end = if i + 1 == anchors.len() {
            line.len()
        } else {
            anchor.span.end
        };
        segments.push(ClientSegment {
            text: &line[start..end],
            start,
            anchor: anchor.span.start - start..anchor.span.end - start,
            phone: anchor.number.start - start..anchor.number.end - start,
        });
        start = anchor.span.end;
    }

    segments
}
