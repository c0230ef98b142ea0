//! Autocorrelation-method linear prediction.

use crate::frame::{FrameGrid, Window};
use crate::math::sqrt;
use alloc::{vec, vec::Vec};
use thiserror::Error;
use tracing::{debug, info};

/// Why a single frame could not be modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameFault {
    /// The frame has zero energy.
    #[error("frame has zero energy")]
    DegenerateFrame,
    /// The Toeplitz solve broke down at the given recursion order.
    #[error("normal equations became singular at order {order}")]
    SingularSystem { order: usize },
}

/// The all-pole model of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LpcModel {
    /// Denominator `[1, -a1, .., -ap]` in ascending powers of `z^-1`.
    pub coefficients: Vec<f64>,
    /// Root-sum-of-squares of the windowed frame.
    pub gain: f64,
    /// Residual energy left after order `p` prediction.
    pub prediction_error: f64,
    /// Reflection coefficients `k1 .. kp` from the recursion.
    pub reflection: Vec<f64>,
}
impl LpcModel {
    /// The model used in place of frames that cannot be analysed:
    /// unit gain and a flat `[1, 0, .., 0]` denominator.
    #[must_use]
    pub fn neutral(order: usize) -> Self {
        let mut coefficients = vec![0.0; order + 1];
        coefficients[0] = 1.0;
        LpcModel {
            coefficients,
            gain: 1.0,
            prediction_error: 0.0,
            reflection: vec![0.0; order],
        }
    }

    #[must_use]
    pub fn order(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Returns `true` if all poles of `1 / A(z)` lie strictly inside the unit circle.
    ///
    /// Runs the step-down recursion on the denominator and checks every
    /// reflection coefficient has magnitude below one.
    #[must_use]
    // fine for us because only an exactly zero leading coefficient is unusable
    #[allow(clippy::float_cmp)]
    pub fn is_stable(&self) -> bool {
        let Some(lead) = self.coefficients.first().copied() else {
            return false;
        };
        if lead == 0.0 || !lead.is_finite() {
            return false;
        }
        let mut a: Vec<f64> = self.coefficients.iter().map(|c| c / lead).collect();
        for m in (1..a.len()).rev() {
            let k = a[m];
            if !k.is_finite() || k.abs() >= 1.0 {
                return false;
            }
            let denom = 1.0 - k * k;
            let prev: Vec<f64> = (0..m).map(|i| (a[i] - k * a[m - i]) / denom).collect();
            a.truncate(m);
            a.copy_from_slice(&prev);
        }
        true
    }
}

/// Biased autocorrelation of `frame` for lags `0..=max_lag`.
/// Lags at or beyond the frame length are zero.
#[must_use]
pub fn autocorrelation(frame: &[f64], max_lag: usize) -> Vec<f64> {
    (0..=max_lag)
        .map(|lag| {
            frame
                .iter()
                .zip(frame.iter().skip(lag))
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect()
}

/// Solves the Toeplitz normal equations for `r` with the Levinson-Durbin recursion.
///
/// Returns the denominator `[1, a1, .., ap]` (with `p = r.len() - 1`), the
/// final prediction error and the reflection coefficients.
///
/// # Errors
///
/// [`FrameFault::DegenerateFrame`] if `r[0]` is zero, [`FrameFault::SingularSystem`]
/// if the prediction error stops being positive and finite.
// fine for us because a frame of exact zeros is the case being detected
#[allow(clippy::float_cmp)]
pub fn levinson_durbin(r: &[f64]) -> Result<(Vec<f64>, f64, Vec<f64>), FrameFault> {
    let order = r.len().saturating_sub(1);
    let mut a = vec![0.0; order + 1];
    a[0] = 1.0;
    let mut reflection = Vec::with_capacity(order);
    let Some(&r0) = r.first() else {
        return Err(FrameFault::DegenerateFrame);
    };
    if r0 == 0.0 {
        return Err(FrameFault::DegenerateFrame);
    }
    let mut err = r0;
    for i in 1..=order {
        if !(err.is_finite() && err > 0.0) {
            return Err(FrameFault::SingularSystem { order: i - 1 });
        }
        let acc: f64 = r[i] + (1..i).map(|j| a[j] * r[i - j]).sum::<f64>();
        let k = -acc / err;
        if !k.is_finite() {
            return Err(FrameFault::SingularSystem { order: i });
        }
        let prev = a.clone();
        for j in 1..i {
            a[j] = prev[j] + k * prev[i - j];
        }
        a[i] = k;
        reflection.push(k);
        err *= 1.0 - k * k;
    }
    if !(err.is_finite() && err >= 0.0) {
        return Err(FrameFault::SingularSystem { order });
    }
    Ok((a, err, reflection))
}

/// Models one windowed frame with an order `order` all-pole predictor.
///
/// # Errors
///
/// Any [`FrameFault`]; callers usually replace the frame with [`LpcModel::neutral`].
pub fn analyze_frame(frame: &[f64], order: usize) -> Result<LpcModel, FrameFault> {
    let r = autocorrelation(frame, order);
    let (coefficients, prediction_error, reflection) = levinson_durbin(&r)?;
    Ok(LpcModel {
        coefficients,
        gain: sqrt(r[0]),
        prediction_error,
        reflection,
    })
}

/// Models of every frame of a signal, in frame order.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub grid: FrameGrid,
    pub window: Window,
    pub models: Vec<LpcModel>,
    /// Frames that were replaced by the neutral model.
    pub degenerate_frames: Vec<usize>,
}

/// Runs [`analyze_frame`] over every frame of `signal`, substituting the
/// neutral model for frames that cannot be analysed.
#[must_use]
pub fn analyze(signal: &[f64], grid: FrameGrid, window: Window, order: usize) -> Analysis {
    let mut degenerate_frames = Vec::new();
    let models: Vec<LpcModel> = grid
        .frames(signal, &window)
        .map(|frame| match analyze_frame(&frame.samples, order) {
            Ok(model) => model,
            Err(fault) => {
                debug!(frame = frame.index, start = frame.start, %fault, "using neutral model");
                degenerate_frames.push(frame.index);
                LpcModel::neutral(order)
            }
        })
        .collect();
    info!(
        frames = models.len(),
        degenerate = degenerate_frames.len(),
        order,
        "analysis done"
    );
    Analysis {
        grid,
        window,
        models,
        degenerate_frames,
    }
}
