//! Building the synthetic excitation signal from annotation segments.

use crate::annotation::{AnnotationRecord, Note, PitchTable};
use crate::error::{AnnotationErrorKind, VocoderError, VocoderResult};
use crate::math::{round, trunc};
use alloc::{format, vec, vec::Vec};
use rand::Rng;
use tracing::info;

/// How annotation times become sample positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentPlacement {
    /// Each segment spans `round(start * sr) .. round(end * sr)`.
    /// Gaps between records stay silent.
    #[default]
    Absolute,
    /// Each segment starts where the previous one ended and lasts
    /// `trunc((end - start) * sr)` samples, ignoring the absolute start time.
    Cumulative,
}

/// Excitation class of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Voicing {
    Silence,
    Unvoiced,
    Voiced { pitch_hz: f64 },
}

/// A contiguous run of excitation samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcitationSegment {
    pub start: usize,
    pub duration: usize,
    pub voicing: Voicing,
}
impl ExcitationSegment {
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.duration
    }
}

/// Turns parsed annotation records into sample-accurate segments.
///
/// # Errors
///
/// [`VocoderError::Annotation`] if a note letter is missing from `table`, or if,
/// with [`SegmentPlacement::Absolute`], a record starts before the previous one ends.
pub fn segments_from_records(
    records: &[AnnotationRecord],
    sample_rate: usize,
    table: PitchTable,
    placement: SegmentPlacement,
) -> VocoderResult<Vec<ExcitationSegment>> {
    let sr = sample_rate as f64;
    let mut segments: Vec<ExcitationSegment> = Vec::with_capacity(records.len());
    let mut previous_end = 0;
    for record in records {
        let fail = |kind| {
            VocoderError::annotation(
                record.line,
                format!("{}\t{}\t{:?}", record.start_time, record.end_time, record.note),
                kind,
            )
        };
        let voicing = match record.note {
            Note::Silence => Voicing::Silence,
            Note::Unvoiced => Voicing::Unvoiced,
            Note::Pitch(symbol) => Voicing::Voiced {
                pitch_hz: table
                    .frequency(symbol)
                    .ok_or_else(|| fail(AnnotationErrorKind::UnknownPitch { symbol }))?,
            },
        };
        let (start, end) = match placement {
            SegmentPlacement::Absolute => (
                to_samples(round(record.start_time * sr)),
                to_samples(round(record.end_time * sr)),
            ),
            SegmentPlacement::Cumulative => {
                let duration = to_samples(trunc((record.end_time - record.start_time) * sr));
                (previous_end, previous_end + duration)
            }
        };
        if start < previous_end {
            return Err(fail(AnnotationErrorKind::Overlap {
                start,
                previous_end,
            }));
        }
        segments.push(ExcitationSegment {
            start,
            duration: end - start,
            voicing,
        });
        previous_end = end;
    }
    Ok(segments)
}

#[allow(clippy::cast_sign_loss)]
fn to_samples(t: f64) -> usize {
    t.max(0.0) as usize
}

/// Number of samples between impulses for a voiced pitch, at least one.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn pitch_period(sample_rate: usize, pitch_hz: f64) -> usize {
    (round(sample_rate as f64 / pitch_hz) as usize).max(1)
}

/// Renders segments into an excitation signal that ends with the last segment.
///
/// Silence is zero, unvoiced regions are uniform noise in
/// `[-amplitude / 2, amplitude / 2)`, and voiced regions are a unit impulse
/// at the start of every pitch period, with the last partial period truncated.
/// Samples not covered by any segment are zero.
pub fn generate_excitation<R: Rng>(
    segments: &[ExcitationSegment],
    sample_rate: usize,
    amplitude: f64,
    rng: &mut R,
) -> Vec<f64> {
    let len = segments.iter().map(ExcitationSegment::end).max().unwrap_or(0);
    let mut excitation = vec![0.0; len];
    for segment in segments {
        let region = &mut excitation[segment.start..segment.end()];
        match segment.voicing {
            Voicing::Silence => {}
            Voicing::Unvoiced => {
                for x in region.iter_mut() {
                    *x = amplitude * (rng.random::<f64>() - 0.5);
                }
            }
            Voicing::Voiced { pitch_hz } => {
                let period = pitch_period(sample_rate, pitch_hz);
                for x in region.iter_mut().step_by(period) {
                    *x = 1.0;
                }
            }
        }
    }
    info!(segments = segments.len(), samples = len, "excitation built");
    excitation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::parse_annotation;
    use rand::{SeedableRng, rngs::SmallRng};

    fn segments(text: &str, placement: SegmentPlacement) -> VocoderResult<Vec<ExcitationSegment>> {
        segments_from_records(&parse_annotation(text)?, 8000, PitchTable::V2, placement)
    }

    #[test]
    fn silence_noise_and_impulse_train() {
        let segs = segments(
            "0\t1.0\tS\n1.0\t2.0\tu\n2.0\t3.0\tA\n",
            SegmentPlacement::Absolute,
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let excitation = generate_excitation(&segs, 8000, 0.05, &mut rng);
        assert_eq!(excitation.len(), 24000);
        assert!(excitation[..8000].iter().all(|x| *x == 0.0));
        let noise = &excitation[8000..16000];
        assert!(noise.iter().all(|x| (-0.025..=0.025).contains(x)));
        assert!(noise.iter().any(|x| *x != 0.0));
        let mean = noise.iter().sum::<f64>() / noise.len() as f64;
        assert!(mean.abs() < 0.002);
        assert_eq!(pitch_period(8000, 220.0), 36);
        for (i, x) in excitation[16000..].iter().enumerate() {
            let expected = if i % 36 == 0 { 1.0 } else { 0.0 };
            assert_eq!(*x, expected, "sample {i}");
        }
    }

    #[test]
    fn absolute_placement_does_not_accumulate_rounding() {
        // each span is 0.33337 s = 2666.96 samples; truncating durations drifts
        let text = "0\t0.33337\tS\n0.33337\t0.66674\tS\n0.66674\t1.00011\tA\n";
        let absolute = segments(text, SegmentPlacement::Absolute).unwrap();
        assert_eq!(absolute[1].start, 2667);
        assert_eq!(absolute[2].start, 5334);
        assert_eq!(absolute[2].end(), 8001);
        let cumulative = segments(text, SegmentPlacement::Cumulative).unwrap();
        assert_eq!(cumulative[1].start, 2666);
        assert_eq!(cumulative[2].start, 5332);
        for pair in cumulative.windows(2) {
            assert_eq!(pair[1].start, pair[0].end());
        }
    }

    #[test]
    fn gaps_are_silent() {
        let segs = segments("0.5\t1.0\tA\n", SegmentPlacement::Absolute).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let excitation = generate_excitation(&segs, 8000, 0.05, &mut rng);
        assert_eq!(excitation.len(), 8000);
        assert!(excitation[..4000].iter().all(|x| *x == 0.0));
        assert_eq!(excitation[4000], 1.0);
    }

    #[test]
    fn overlapping_records_are_rejected() {
        let err = segments("0\t1.0\tS\n0.5\t2.0\tA\n", SegmentPlacement::Absolute).unwrap_err();
        assert!(matches!(
            err,
            VocoderError::Annotation {
                line: 2,
                kind: AnnotationErrorKind::Overlap {
                    start: 4000,
                    previous_end: 8000
                },
                ..
            }
        ));
        assert!(segments("0\t1.0\tS\n0.5\t2.0\tA\n", SegmentPlacement::Cumulative).is_ok());
    }

    #[test]
    fn unknown_pitch_symbol_is_rejected() {
        let err = segments("0\t1.0\tH\n", SegmentPlacement::Absolute).unwrap_err();
        assert!(matches!(
            err,
            VocoderError::Annotation {
                kind: AnnotationErrorKind::UnknownPitch { symbol: 'H' },
                ..
            }
        ));
    }

    #[test]
    fn empty_annotation_gives_empty_excitation() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(generate_excitation(&[], 8000, 0.05, &mut rng).is_empty());
    }
}
