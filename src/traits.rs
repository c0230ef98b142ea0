use alloc::vec::Vec;

pub trait BasicFilter {
    /// Returns the polynomial coefficients of the filter transfer function in the z-plane.
    /// The returned array contains the top and bottom coefficients of the rational fraction, ordered in ascending powers of `z^-1`.
    fn get_transfer_function_coefficients(&self) -> Vec<Vec<f64>>;
    /// Perform one step of a filter.
    fn step(&mut self, x: f64) -> f64;
    /// Runs the filter over a whole buffer, one causal pass.
    fn process(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|x| self.step(*x)).collect()
    }
}
