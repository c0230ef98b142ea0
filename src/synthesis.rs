//! Re-driving the frame models with the excitation and overlap-adding the result.

use crate::filter::AllPoleFilter;
use crate::frame::{FrameGrid, Window};
use crate::lpc::LpcModel;
use crate::traits::BasicFilter;
use alloc::{vec, vec::Vec};
use tracing::{info, warn};

/// Which input ran out first when the excitation and the analysis disagree in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// The excitation ends before every model was used.
    ExcitationExhausted { dropped_models: usize },
    /// The models run out while whole excitation frames remain.
    ModelsExhausted { uncovered_samples: usize },
}

/// The number of frames synthesis will run, fixed before any work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisPlan {
    pub grid: FrameGrid,
    pub model_count: usize,
    pub excitation_len: usize,
    /// `min(model_count, grid.frame_count(excitation_len))`
    pub frames: usize,
    pub truncation: Option<Truncation>,
}
impl SynthesisPlan {
    #[must_use]
    pub fn new(grid: FrameGrid, model_count: usize, excitation_len: usize) -> Self {
        let excitation_frames = grid.frame_count(excitation_len);
        let mut plan = SynthesisPlan {
            grid,
            model_count,
            excitation_len,
            frames: model_count.min(excitation_frames),
            truncation: None,
        };
        if excitation_frames < model_count {
            plan.truncation = Some(Truncation::ExcitationExhausted {
                dropped_models: model_count - excitation_frames,
            });
        } else if model_count < excitation_frames {
            plan.truncation = Some(Truncation::ModelsExhausted {
                uncovered_samples: excitation_len - plan.covered_len(),
            });
        }
        plan
    }

    /// One past the last output sample any frame may touch.
    #[must_use]
    pub fn covered_len(&self) -> usize {
        if self.frames == 0 {
            0
        } else {
            self.grid.start(self.frames - 1) + self.grid.frame_len()
        }
    }
}

/// The windowed, filtered output of one frame, placed at `offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContribution {
    pub offset: usize,
    pub samples: Vec<f64>,
}

/// Filters one excitation slice through `model` and applies the window.
#[must_use]
pub fn render_frame(model: &LpcModel, excitation: &[f64], window: &Window) -> Vec<f64> {
    let filtered = AllPoleFilter::new(model.gain, &model.coefficients).process(excitation);
    window.apply(&filtered)
}

/// Yields the contribution of every planned frame, in frame order.
pub fn contributions<'a>(
    plan: &'a SynthesisPlan,
    models: &'a [LpcModel],
    excitation: &'a [f64],
    window: &'a Window,
) -> impl Iterator<Item = FrameContribution> + 'a {
    models.iter().take(plan.frames).enumerate().map(move |(i, model)| {
        let offset = plan.grid.start(i);
        let slice = &excitation[offset..offset + plan.grid.frame_len()];
        FrameContribution {
            offset,
            samples: render_frame(model, slice, window),
        }
    })
}

/// Sums contributions into a zeroed buffer of `len` samples.
///
/// # Panics
///
/// If a contribution reaches past `len`.
#[must_use]
pub fn overlap_add<I>(len: usize, contributions: I) -> Vec<f64>
where
    I: IntoIterator<Item = FrameContribution>,
{
    contributions
        .into_iter()
        .fold(vec![0.0; len], |mut acc, contribution| {
            let end = contribution.offset + contribution.samples.len();
            for (out, x) in acc[contribution.offset..end]
                .iter_mut()
                .zip(&contribution.samples)
            {
                *out += x;
            }
            acc
        })
}

/// Synthesizes an output as long as `excitation` from the frame models.
/// Samples past [`SynthesisPlan::covered_len`] stay zero.
#[must_use]
pub fn synthesize(
    grid: FrameGrid,
    window: &Window,
    models: &[LpcModel],
    excitation: &[f64],
) -> (Vec<f64>, SynthesisPlan) {
    let plan = SynthesisPlan::new(grid, models.len(), excitation.len());
    match plan.truncation {
        Some(Truncation::ExcitationExhausted { dropped_models }) => {
            warn!(
                dropped_models,
                excitation_len = plan.excitation_len,
                "excitation is shorter than the analysed signal, synthesis truncated"
            );
        }
        Some(Truncation::ModelsExhausted { uncovered_samples }) => {
            warn!(
                uncovered_samples,
                models = plan.model_count,
                "excitation outlasts the analysed signal, tail left silent"
            );
        }
        None => {}
    }
    let out = overlap_add(
        excitation.len(),
        contributions(&plan, models, excitation, window),
    );
    info!(frames = plan.frames, samples = out.len(), "synthesis done");
    (out, plan)
}
