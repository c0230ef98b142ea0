use crate::traits::BasicFilter;
use alloc::{vec, vec::Vec};

/// A first-order FIR pre-emphasis filter.
///
/// # Formulas:
/// ## Variables:
/// ```text
///    x = input samples
///    y = output samples
///    a = emphasis coefficient, 0.95 for speech
/// ```
/// ## Filter function:
/// ```text
///    y[n] = x[n] - a * x[n-1]
/// ```
/// ## Transfer function:
/// ```text
///    H(z) = 1 - a * z^-1
/// ```
pub struct PreEmphasis {
    a: f64,
    /// x[n-1], last input value
    x1: f64,
}
impl PreEmphasis {
    pub fn new(a: f64) -> Self {
        PreEmphasis { a, x1: 0.0 }
    }
}
impl BasicFilter for PreEmphasis {
    fn get_transfer_function_coefficients(&self) -> Vec<Vec<f64>> {
        vec![vec![1.0, -self.a], vec![1.0]]
    }

    fn step(&mut self, x: f64) -> f64 {
        let y = x - self.a * self.x1;
        self.x1 = x;
        y
    }
}

/// The exact inverse of [`PreEmphasis`], a first-order IIR filter.
///
/// # Formulas:
/// ## Filter function:
/// ```text
///    y[n] = x[n] + a * y[n-1]
/// ```
/// ## Transfer function:
/// ```text
///    H(z) = 1 / (1 - a * z^-1)
/// ```
pub struct DeEmphasis {
    a: f64,
    /// y[n-1], last output value
    y1: f64,
}
impl DeEmphasis {
    pub fn new(a: f64) -> Self {
        DeEmphasis { a, y1: 0.0 }
    }
}
impl BasicFilter for DeEmphasis {
    fn get_transfer_function_coefficients(&self) -> Vec<Vec<f64>> {
        vec![vec![1.0], vec![1.0, -self.a]]
    }

    fn step(&mut self, x: f64) -> f64 {
        let y = x + self.a * self.y1;
        self.y1 = y;
        y
    }
}

/// Applies pre-emphasis to a whole signal in one causal pass.
#[must_use]
pub fn pre_emphasize(signal: &[f64], a: f64) -> Vec<f64> {
    PreEmphasis::new(a).process(signal)
}

/// Undoes [`pre_emphasize`] over a whole signal in one causal pass.
#[must_use]
pub fn de_emphasize(signal: &[f64], a: f64) -> Vec<f64> {
    DeEmphasis::new(a).process(signal)
}

/// An all-pole synthesis filter with a scalar feed-forward gain.
/// The internal state starts at zero.
///
/// # Formulas:
/// ## Variables:
/// ```text
///    g = gain
///    a = denominator [a0, a1, .., ap], a0 normally 1
/// ```
/// ## Filter function:
/// ```text
///    y[n] = (g * x[n] - a1 * y[n-1] - .. - ap * y[n-p]) / a0
/// ```
/// ## Transfer function:
/// ```text
///    H(z) = g / (a0 + a1 * z^-1 + .. + ap * z^-p)
/// ```
pub struct AllPoleFilter<'a> {
    gain: f64,
    a: &'a [f64],
    /// y[n-1], y[n-2], .. last output values, most recent first
    y: Vec<f64>,
}
impl<'a> AllPoleFilter<'a> {
    /// `a` must hold at least the leading coefficient, and it must not be zero.
    pub fn new(gain: f64, a: &'a [f64]) -> Self {
        AllPoleFilter {
            gain,
            a,
            y: vec![0.0; a.len().saturating_sub(1)],
        }
    }
}
impl BasicFilter for AllPoleFilter<'_> {
    fn get_transfer_function_coefficients(&self) -> Vec<Vec<f64>> {
        vec![vec![self.gain], self.a.to_vec()]
    }

    fn step(&mut self, x: f64) -> f64 {
        let feedback: f64 = self.a[1..]
            .iter()
            .zip(self.y.iter())
            .map(|(a, y)| a * y)
            .sum();
        let y = (self.gain * x - feedback) / self.a[0];
        if !self.y.is_empty() {
            self.y.rotate_right(1);
            self.y[0] = y;
        }
        y
    }
}
