pub mod fields;
pub mod gender;
pub mod names;

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::parser::segments::ClientSegment;
use fields::{extract_fields, Fields};
use gender::{Gender, GenderInference};
use names::{locate_name, ValidName};

/// One client recovered from free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedClientRecord {
    pub name: String,
    pub email: String,
    /// Digits only.
    pub phone: String,
    pub gender: Gender,
}

/// Why a segment produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    LineTooShort,
    NoPhoneAnchor,
    MissingEmail,
    InvalidName,
    DuplicateEmail,
}

impl RejectReason {
    pub const ALL: [RejectReason; 5] = [
        RejectReason::LineTooShort,
        RejectReason::NoPhoneAnchor,
        RejectReason::MissingEmail,
        RejectReason::InvalidName,
        RejectReason::DuplicateEmail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::LineTooShort => "line_too_short",
            RejectReason::NoPhoneAnchor => "no_phone_anchor",
            RejectReason::MissingEmail => "missing_email",
            RejectReason::InvalidName => "invalid_name",
            RejectReason::DuplicateEmail => "duplicate_email",
        }
    }
}

/// Records for the segments of one line, in segment order.
///
/// Gender markers are read from a window per client: from its name (the line
/// start for the first client) up to where the next client's name begins. A
/// marker column trailing one client's phone therefore stays with that client.
pub fn extract_line(
    line: &str,
    segments: &[ClientSegment<'_>],
    name_tokens: usize,
    lexicon: &Lexicon,
    inference: &GenderInference,
) -> Vec<Result<ExtractedClientRecord, RejectReason>> {
    let parsed: Vec<_> = segments
        .iter()
        .map(|segment| parse_segment(segment, name_tokens, lexicon))
        .collect();
    // line offsets of each accepted name
    let name_starts: Vec<Option<usize>> = segments
        .iter()
        .zip(&parsed)
        .map(|(segment, p)| p.as_ref().ok().map(|(_, name)| segment.start + name.start))
        .collect();

    parsed
        .into_iter()
        .enumerate()
        .map(|(i, p)| -> Result<ExtractedClientRecord, RejectReason> {
            let (fields, name) = p?;
            let from = if i == 0 { 0 } else { segments[i].start + name.start };
            let to = match segments.get(i + 1) {
                Some(next) => name_starts[i + 1].unwrap_or(next.start),
                None => line.len(),
            };
            let gender = inference.infer(&name.text, Some(&line[from..to]), lexicon);

            Ok(ExtractedClientRecord {
                name: name.text,
                email: fields.email,
                phone: fields.phone,
                gender,
            })
        })
        .collect()
}

fn parse_segment<'a>(
    segment: &ClientSegment<'a>,
    name_tokens: usize,
    lexicon: &Lexicon,
) -> Result<(Fields<'a>, ValidName), RejectReason> {
    let fields = extract_fields(segment).ok_or(RejectReason::MissingEmail)?;
    let name = locate_name(fields.residual, name_tokens, lexicon).ok_or(RejectReason::InvalidName)?;
    Ok((fields, name))
}
