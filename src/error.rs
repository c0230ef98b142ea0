//! Error types for the vocoder pipeline.

use alloc::string::String;
use thiserror::Error;

/// Result type for vocoder operations.
pub type VocoderResult<T> = Result<T, VocoderError>;

/// Errors that abort a whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VocoderError {
    /// A parameter was rejected before processing started.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParms {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// An annotation line could not be turned into an excitation segment.
    #[error("annotation line {line} ({content:?}): {kind}")]
    Annotation {
        /// 1-based line number in the annotation text.
        line: usize,
        /// The offending line, without its line ending.
        content: String,
        /// What is wrong with the line.
        kind: AnnotationErrorKind,
    },

    /// The synthesized signal has no positive peak to normalize against.
    #[error("degenerate output: peak amplitude is {peak}")]
    DegenerateOutput {
        /// The peak that was found.
        peak: f64,
    },
}

impl VocoderError {
    /// Creates an invalid parameter error.
    pub fn invalid_parm(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParms {
            name,
            message: message.into(),
        }
    }

    /// Creates an annotation error for the given line.
    pub fn annotation(line: usize, content: impl Into<String>, kind: AnnotationErrorKind) -> Self {
        Self::Annotation {
            line,
            content: content.into(),
            kind,
        }
    }
}

/// Reasons an annotation line is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnotationErrorKind {
    /// The line does not have exactly three tab-separated fields.
    #[error("expected 3 tab-separated fields, found {found}")]
    FieldCount {
        /// Number of fields found.
        found: usize,
    },

    /// A time field is not a finite, non-negative number.
    #[error("invalid {field} time {value:?}")]
    InvalidTime {
        /// `"start"` or `"end"`.
        field: &'static str,
        /// The raw field text.
        value: String,
    },

    /// The end time lies before the start time.
    #[error("end time {end} precedes start time {start}")]
    ReversedSpan {
        /// Start time in seconds.
        start: f64,
        /// End time in seconds.
        end: f64,
    },

    /// The record starts before the previous record ends.
    #[error("starts at sample {start} but the previous segment ends at sample {previous_end}")]
    Overlap {
        /// Start sample of this record.
        start: usize,
        /// End sample of the previous record.
        previous_end: usize,
    },

    /// The note token does not start with a voicing class or note letter.
    #[error("unrecognized voicing token {token:?}")]
    UnknownVoicing {
        /// The raw token.
        token: String,
    },

    /// The note letter is absent from the pitch table.
    #[error("pitch symbol '{symbol}' is not in the pitch table")]
    UnknownPitch {
        /// The note letter, upper-cased.
        symbol: char,
    },
}
