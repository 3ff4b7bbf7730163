pub mod extract;
pub mod lines;
pub mod segments;

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::lexicon::Lexicon;
use extract::gender::GenderInference;
use extract::{extract_line, ExtractedClientRecord, RejectReason};

/// Pulls client records out of `text` with the built-in lexicon and defaults.
pub fn extract_clients(text: &str) -> Vec<ExtractedClientRecord> {
    Extractor::default().extract(text)
}

/// Something that was skipped, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// 1-based line number in the input text.
    pub line: usize,
    pub reason: RejectReason,
    pub excerpt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub records: Vec<ExtractedClientRecord>,
    pub rejections: Vec<Rejection>,
    pub lines: usize,
    pub segments: usize,
}

impl ExtractionReport {
    pub fn rejection_counts(&self) -> BTreeMap<RejectReason, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.rejections {
            *counts.entry(r.reason).or_insert(0) += 1;
        }
        counts
    }
}

/// Normalize and segment lines → split on phone anchors → extract → dedup.
///
/// Holds configuration only; every call builds its own seen-email set, so a
/// shared `Extractor` can serve concurrent calls.
pub struct Extractor {
    settings: Settings,
    lexicon: Lexicon,
    inference: GenderInference,
}

impl Extractor {
    pub fn new(settings: Settings, lexicon: Lexicon) -> Self {
        let inference = GenderInference::new(settings.default_gender);
        Extractor {
            settings,
            lexicon,
            inference,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn extract(&self, text: &str) -> Vec<ExtractedClientRecord> {
        self.extract_with_report(text).records
    }

    pub fn extract_with_report(&self, text: &str) -> ExtractionReport {
        let mut report = ExtractionReport::default();
        let mut seen: HashSet<String> = HashSet::new();

        for line in lines::segment_lines(text, self.settings.min_line_chars) {
            report.lines += 1;
            if !line.candidate {
                reject(&mut report, line.number, RejectReason::LineTooShort, &line.text);
                continue;
            }

            let segments = segments::split_segments(&line.text);
            if segments.is_empty() {
                reject(&mut report, line.number, RejectReason::NoPhoneAnchor, &line.text);
                continue;
            }
            report.segments += segments.len();

            let results = extract_line(
                &line.text,
                &segments,
                self.settings.name_tokens,
                &self.lexicon,
                &self.inference,
            );
            for (segment, result) in segments.iter().zip(results) {
                let record = match result {
                    Ok(r) => r,
                    Err(reason) => {
                        reject(&mut report, line.number, reason, segment.text);
                        continue;
                    }
                };

                if !seen.insert(record.email.clone()) {
                    reject(&mut report, line.number, RejectReason::DuplicateEmail, segment.text);
                    continue;
                }
                report.records.push(record);
            }
        }

        info!(
            lines = report.lines,
            segments = report.segments,
            accepted = report.records.len(),
            rejected = report.rejections.len(),
            "client extraction finished"
        );
        report
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor::new(Settings::default(), Lexicon::default())
    }
}

fn reject(report: &mut ExtractionReport, line: usize, reason: RejectReason, text: &str) {
    debug!(line, reason = reason.as_str(), "skipped");
    report.rejections.push(Rejection {
        line,
        reason,
        excerpt: excerpt(text, 80),
    });
}

fn excerpt(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──
