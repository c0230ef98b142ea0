use std::f64::consts::PI;
use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use lpc_vocoder::{
    LpcModel, Signal, Truncation, VocoderError, VocoderParms, Window, render, resynthesize,
};
use rand::{SeedableRng, rngs::SmallRng};

const SAMPLE_RATE: usize = 8000;

/// A vowel-like test signal: a 100 Hz pulse train through two resonators.
fn sung_vowel(seconds: f64) -> Vec<f64> {
    let len = (seconds * SAMPLE_RATE as f64) as usize;
    let mut out = vec![0.0; len];
    let mut y = [[0.0f64; 2]; 2];
    for (n, sample) in out.iter_mut().enumerate() {
        let mut x = if n % 80 == 0 { 1000.0 } else { 0.0 };
        for (i, (f, bw)) in [(700.0f64, 80.0f64), (1200.0, 100.0)].iter().enumerate() {
            let r = (-PI * bw / SAMPLE_RATE as f64).exp();
            let b = 2.0 * r * (2.0 * PI * f / SAMPLE_RATE as f64).cos();
            let c = -r * r;
            let v = (1.0 - b - c) * x + b * y[i][0] + c * y[i][1];
            y[i][1] = y[i][0];
            y[i][0] = v;
            x = v;
        }
        *sample = x;
    }
    out
}

fn wav_round_trip(samples: &[f64]) -> Signal {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for s in samples {
            writer.write_sample(s.round().clamp(-32768.0, 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.set_position(0);
    let mut reader = WavReader::new(cursor).unwrap();
    Signal {
        sample_rate: reader.spec().sample_rate as usize,
        samples: reader
            .samples::<i16>()
            .map(|s| f64::from(s.unwrap()))
            .collect(),
    }
}

/// Lag in `min_lag..=max_lag` with the largest autocorrelation over a fixed span.
fn dominant_lag(x: &[f64], min_lag: usize, max_lag: usize) -> usize {
    let span = &x[..x.len() - max_lag];
    let mean = x.iter().sum::<f64>() / x.len() as f64;
    (min_lag..=max_lag)
        .max_by(|a, b| {
            let ra: f64 = span.iter().enumerate().map(|(n, v)| (v - mean) * (x[n + a] - mean)).sum();
            let rb: f64 = span.iter().enumerate().map(|(n, v)| (v - mean) * (x[n + b] - mean)).sum();
            ra.total_cmp(&rb)
        })
        .unwrap()
}

#[test]
fn resynthesizes_recording_with_annotated_pitch() {
    let signal = wav_round_trip(&sung_vowel(1.0));
    assert_eq!(signal.samples.len(), SAMPLE_RATE);
    let annotation = "0.000000\t0.250000\tS\n0.250000\t0.500000\tU\n0.500000\t1.000000\tc\n";
    let mut rng = SmallRng::seed_from_u64(69);
    let parms = VocoderParms::default();
    let out = resynthesize(&parms, &signal, annotation, &mut rng).unwrap();

    assert_eq!(out.sample_rate, SAMPLE_RATE);
    assert_eq!(out.samples.len(), SAMPLE_RATE);
    assert_eq!(out.plan.frames, (SAMPLE_RATE - 240) / 40 + 1);
    assert_eq!(out.plan.truncation, None);
    assert!(out.degenerate_frames.is_empty());
    assert!(out.samples.iter().all(|s| s.is_finite()));
    let peak = out.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!((peak - 10000.0).abs() < 1E-6);
    // voiced part repeats every round(8000 / 261.63) = 31 samples
    assert_eq!(dominant_lag(&out.samples[5000..7500], 20, 45), 31);
}

#[test]
fn single_formant_model_follows_annotated_pitch() {
    let parms = VocoderParms::default();
    let grid = parms.grid(SAMPLE_RATE).unwrap();
    let window = Window::new(parms.window, grid.frame_len());
    let r: f64 = 0.97;
    let w = 2.0 * PI * 500.0 / SAMPLE_RATE as f64;
    let mut model = LpcModel::neutral(parms.order);
    model.coefficients[1] = -2.0 * r * w.cos();
    model.coefficients[2] = r * r;
    assert!(model.is_stable());
    let models = vec![model; grid.frame_count(SAMPLE_RATE)];

    let records = lpc_vocoder::parse_annotation("0\t1.0\tA\n").unwrap();
    let segments = lpc_vocoder::segments_from_records(
        &records,
        SAMPLE_RATE,
        parms.pitch_table,
        parms.placement,
    )
    .unwrap();
    let mut rng = SmallRng::seed_from_u64(1);
    let excitation =
        lpc_vocoder::generate_excitation(&segments, SAMPLE_RATE, parms.unvoiced_amplitude, &mut rng);

    let (out, plan) = render(&parms, grid, &window, &models, &excitation).unwrap();
    assert_eq!(plan.truncation, None);
    assert_eq!(dominant_lag(&out[1000..7000], 20, 60), 36);
}

#[test]
fn short_annotation_truncation_is_reported() {
    let signal = Signal {
        sample_rate: SAMPLE_RATE,
        samples: sung_vowel(1.0),
    };
    let mut rng = SmallRng::seed_from_u64(2);
    let out = resynthesize(&VocoderParms::default(), &signal, "0\t0.5\tB\n", &mut rng).unwrap();
    assert_eq!(out.samples.len(), SAMPLE_RATE / 2);
    let all_frames = (SAMPLE_RATE - 240) / 40 + 1;
    let kept = (SAMPLE_RATE / 2 - 240) / 40 + 1;
    assert_eq!(out.plan.frames, kept);
    assert_eq!(
        out.plan.truncation,
        Some(Truncation::ExcitationExhausted {
            dropped_models: all_frames - kept
        })
    );
}

#[test]
fn silent_result_is_an_error() {
    let signal = Signal {
        sample_rate: SAMPLE_RATE,
        samples: vec![0.0; SAMPLE_RATE],
    };
    let mut rng = SmallRng::seed_from_u64(3);
    let err = resynthesize(&VocoderParms::default(), &signal, "0\t1.0\tS\n", &mut rng).unwrap_err();
    assert_eq!(err, VocoderError::DegenerateOutput { peak: 0.0 });
}

#[test]
fn malformed_annotation_aborts_the_run() {
    let signal = Signal {
        sample_rate: SAMPLE_RATE,
        samples: sung_vowel(0.5),
    };
    let mut rng = SmallRng::seed_from_u64(4);
    let err = resynthesize(&VocoderParms::default(), &signal, "0\t0.5\tS\n0.5\t0.6\n", &mut rng)
        .unwrap_err();
    assert!(matches!(err, VocoderError::Annotation { line: 2, .. }));
}
