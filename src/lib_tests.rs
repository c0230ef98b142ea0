use super::math::{cos, round, sqrt, trunc};
use super::{PitchTable, pitch_period};

#[test]
fn math_shims_work() {
    assert_eq!(sqrt(16f64), 4.0);
    assert_eq!(cos(0f64), 1.0);
    assert_eq!(round(36.36f64), 36.0);
    assert_eq!(round(2666.5f64), 2667.0);
    assert_eq!(trunc(2666.96f64), 2666.0);
    assert_eq!(trunc(-0.5f64), 0.0);
}

#[test]
fn pitch_periods_at_8k() {
    let periods: Vec<usize> = ('A'..='G')
        .map(|note| pitch_period(8000, PitchTable::V2.frequency(note).unwrap()))
        .collect();
    assert_eq!(periods, vec![36, 32, 31, 27, 24, 23, 20]);
    assert_eq!(pitch_period(8000, 1E9), 1);
}
