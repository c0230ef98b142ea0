//! Peak normalization and text export of the final signal.

use crate::error::{VocoderError, VocoderResult};
use alloc::vec::Vec;

/// Rescales `samples` so that the largest signed value becomes `peak_level`.
///
/// The peak is the maximum signed sample, not the maximum magnitude, so a
/// negative excursion may exceed `peak_level` in size.
///
/// # Errors
///
/// [`VocoderError::DegenerateOutput`] if the buffer is empty or its peak is not
/// a positive finite number.
pub fn normalize(samples: &[f64], peak_level: f64) -> VocoderResult<Vec<f64>> {
    let peak = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(peak.is_finite() && peak > 0.0) {
        return Err(VocoderError::DegenerateOutput {
            peak: if samples.is_empty() { 0.0 } else { peak },
        });
    }
    Ok(samples.iter().map(|s| peak_level * s / peak).collect())
}

/// Writes one sample per line.
///
/// # Errors
///
/// Whatever `writer` reports.
#[cfg(feature = "std")]
pub fn write_text<W: std::io::Write>(samples: &[f64], mut writer: W) -> std::io::Result<()> {
    for s in samples {
        writeln!(writer, "{s}")?;
    }
    writer.flush()
}
