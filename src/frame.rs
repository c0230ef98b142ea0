//! Slicing a signal into overlapping, windowed analysis frames.

use crate::error::{VocoderError, VocoderResult};
use crate::math::cos;
use alloc::{vec, vec::Vec};
use core::f64::consts::PI;

/// Shape of the analysis/synthesis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    /// `0.54 - 0.46 * cos(2 * PI * n / (M - 1))`
    #[default]
    Hamming,
    /// `0.5 - 0.5 * cos(2 * PI * n / (M - 1))`
    Hann,
}

/// Per-sample window weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    weights: Vec<f64>,
}
impl Window {
    /// Builds a symmetric window of `len` weights.
    /// A single-sample window is `[1.0]`, an empty one has no weights.
    #[must_use]
    pub fn new(kind: WindowKind, len: usize) -> Self {
        let (a0, a1) = match kind {
            WindowKind::Hamming => (0.54, 0.46),
            WindowKind::Hann => (0.5, 0.5),
        };
        let weights = match len {
            0 => Vec::new(),
            1 => vec![1.0],
            _ => (0..len)
                .map(|n| a0 - a1 * cos(2.0 * PI * n as f64 / (len - 1) as f64))
                .collect(),
        };
        Window { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Elementwise product of `samples` and the weights.
    /// The result is as long as the shorter of the two.
    #[must_use]
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        samples
            .iter()
            .zip(&self.weights)
            .map(|(s, w)| s * w)
            .collect()
    }
}

/// The frame layout shared by analysis and synthesis: frames of `window_size`
/// samples start every `step_size` samples.
///
/// Only the first `window_size - 1` samples of each frame are used, which is
/// also the length of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGrid {
    window_size: usize,
    step_size: usize,
}
impl FrameGrid {
    /// # Errors
    ///
    /// Frames must overlap (`step_size < window_size`), the hop must be
    /// non-zero and a frame must hold at least one windowed sample.
    pub fn new(window_size: usize, step_size: usize) -> VocoderResult<Self> {
        if window_size < 2 {
            return Err(VocoderError::invalid_parm(
                "window_size",
                alloc::format!("{window_size} samples is too short, need at least 2"),
            ));
        }
        if step_size == 0 {
            return Err(VocoderError::invalid_parm("step_size", "must be non-zero"));
        }
        if step_size >= window_size {
            return Err(VocoderError::invalid_parm(
                "step_size",
                alloc::format!(
                    "{step_size} samples leaves no overlap with a {window_size} sample window"
                ),
            ));
        }
        Ok(FrameGrid {
            window_size,
            step_size,
        })
    }

    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    #[must_use]
    pub fn step_size(&self) -> usize {
        self.step_size
    }

    /// Number of samples in each windowed frame.
    #[must_use]
    pub fn frame_len(&self) -> usize {
        self.window_size - 1
    }

    /// Offset of frame `index`.
    #[must_use]
    pub fn start(&self, index: usize) -> usize {
        index * self.step_size
    }

    /// How many whole frames fit in `len` samples.
    /// A trailing partial frame is dropped, never padded.
    #[must_use]
    pub fn frame_count(&self, len: usize) -> usize {
        if len < self.window_size {
            0
        } else {
            (len - self.window_size) / self.step_size + 1
        }
    }

    /// Iterates the windowed frames of `signal`.
    ///
    /// # Panics
    ///
    /// If `window` is not `frame_len()` long.
    #[must_use]
    pub fn frames<'a>(&self, signal: &'a [f64], window: &'a Window) -> Frames<'a> {
        assert_eq!(
            window.len(),
            self.frame_len(),
            "window length must be one less than the frame size"
        );
        Frames {
            grid: *self,
            signal,
            window,
            index: 0,
            count: self.frame_count(signal.len()),
        }
    }
}

/// One windowed analysis frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub start: usize,
    pub samples: Vec<f64>,
}

/// Lazy iterator over the frames of a signal.
/// Cloning it gives an independent iterator from the same position.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    grid: FrameGrid,
    signal: &'a [f64],
    window: &'a Window,
    index: usize,
    count: usize,
}
impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.index >= self.count {
            return None;
        }
        let start = self.grid.start(self.index);
        let raw = &self.signal[start..start + self.grid.frame_len()];
        let frame = Frame {
            index: self.index,
            start,
            samples: self.window.apply(raw),
        };
        self.index += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}
impl ExactSizeIterator for Frames<'_> {}
