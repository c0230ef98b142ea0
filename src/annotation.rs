//! Pitch/duration annotations in tab-separated label format:
//! `start_seconds \t end_seconds \t note_token` per line.

use crate::error::{AnnotationErrorKind, VocoderError, VocoderResult};
use alloc::{string::ToString, vec::Vec};

/// Note letter to frequency mapping.
///
/// Both versions map the letters `A` to `G`; they differ by one octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitchTable {
    /// A = 110 Hz.
    V1,
    /// A = 220 Hz.
    #[default]
    V2,
}

const PITCHES_V1: [(char, f64); 7] = [
    ('A', 110.0),
    ('B', 123.42),
    ('C', 130.81),
    ('D', 146.83),
    ('E', 164.81),
    ('F', 174.61),
    ('G', 196.00),
];
const PITCHES_V2: [(char, f64); 7] = [
    ('A', 220.0),
    ('B', 246.94),
    ('C', 261.63),
    ('D', 293.64),
    ('E', 329.63),
    ('F', 349.23),
    ('G', 392.00),
];

impl PitchTable {
    /// Frequency in Hz of a note letter, in either case.
    #[must_use]
    pub fn frequency(self, symbol: char) -> Option<f64> {
        let table = match self {
            PitchTable::V1 => &PITCHES_V1,
            PitchTable::V2 => &PITCHES_V2,
        };
        let symbol = symbol.to_ascii_uppercase();
        table.iter().find(|(s, _)| *s == symbol).map(|(_, f)| *f)
    }
}

/// What a line asks the excitation to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    Silence,
    Unvoiced,
    /// An upper-cased note letter, not yet resolved through a [`PitchTable`].
    Pitch(char),
}
impl Note {
    fn from_token(token: &str) -> Option<Self> {
        let first = token.chars().next()?.to_ascii_uppercase();
        match first {
            'S' => Some(Note::Silence),
            'U' => Some(Note::Unvoiced),
            c if c.is_ascii_alphabetic() => Some(Note::Pitch(c)),
            _ => None,
        }
    }
}

/// One parsed annotation line.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    /// 1-based line number, for error reporting.
    pub line: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub note: Note,
}

/// Parses annotation text, skipping blank lines.
/// Records are returned in file order.
///
/// # Errors
///
/// [`VocoderError::Annotation`] for the first malformed line.
pub fn parse_annotation(text: &str) -> VocoderResult<Vec<AnnotationRecord>> {
    let mut records = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let content = raw.trim_end_matches('\r');
        if content.trim().is_empty() {
            continue;
        }
        let fail = |kind| VocoderError::annotation(line, content, kind);
        let fields: Vec<&str> = content.split('\t').collect();
        let [start, end, token] = fields[..] else {
            return Err(fail(AnnotationErrorKind::FieldCount {
                found: fields.len(),
            }));
        };
        let start_time = parse_time(start, "start").map_err(fail)?;
        let end_time = parse_time(end, "end").map_err(fail)?;
        if end_time < start_time {
            return Err(fail(AnnotationErrorKind::ReversedSpan {
                start: start_time,
                end: end_time,
            }));
        }
        let note = Note::from_token(token.trim()).ok_or_else(|| {
            fail(AnnotationErrorKind::UnknownVoicing {
                token: token.to_string(),
            })
        })?;
        records.push(AnnotationRecord {
            line,
            start_time,
            end_time,
            note,
        });
    }
    Ok(records)
}

fn parse_time(value: &str, field: &'static str) -> Result<f64, AnnotationErrorKind> {
    match value.trim().parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => Ok(t),
        _ => Err(AnnotationErrorKind::InvalidTime {
            field,
            value: value.to_string(),
        }),
    }
}
