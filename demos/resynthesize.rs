use std::fs::{self, File};
use std::io::BufWriter;

use clap::Parser;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use lpc_vocoder::{PitchTable, SegmentPlacement, Signal, VocoderParms, resynthesize, write_text};
use rand::{SeedableRng, rngs::SmallRng};
use tracing_subscriber::EnvFilter;

/// Resynthesizes a mono WAV recording with the pitch track from a label file.
#[derive(Parser, Debug)]
struct Args {
    /// Mono input recording, already at the analysis sample rate.
    input: String,
    /// Tab-separated `start end note` label file.
    notes: String,
    /// Output WAV file.
    #[arg(short, long, default_value = "synth_out.wav")]
    output: String,
    /// Also write the samples as text, one per line.
    #[arg(long)]
    text: Option<String>,
    /// Use the A = 110 Hz pitch table.
    #[arg(long)]
    low_octave: bool,
    /// Place segments back to back instead of at their annotated times.
    #[arg(long)]
    cumulative: bool,
    #[arg(long, default_value_t = 69)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut reader = WavReader::open(&args.input).expect("error opening input file");
    let spec = reader.spec();
    if spec.channels != 1 {
        panic!("can't handle stereo file yet");
    }
    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| f64::from(s.expect("error reading sample")))
            .collect(),
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| f64::from(s.expect("error reading sample")))
            .collect(),
    };
    let signal = Signal {
        sample_rate: spec.sample_rate as usize,
        samples,
    };
    let notes = fs::read_to_string(&args.notes).expect("error reading label file");

    let parms = VocoderParms {
        pitch_table: if args.low_octave {
            PitchTable::V1
        } else {
            PitchTable::V2
        },
        placement: if args.cumulative {
            SegmentPlacement::Cumulative
        } else {
            SegmentPlacement::Absolute
        },
        ..VocoderParms::default()
    };
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let out = match resynthesize(&parms, &signal, &notes, &mut rng) {
        Ok(out) => out,
        Err(error) => {
            println!("Error: {error}");
            std::process::exit(1);
        }
    };
    if let Some(truncation) = out.plan.truncation {
        println!("Warning: {truncation:?}");
    }

    let mut wav = WavWriter::create(
        &args.output,
        WavSpec {
            channels: 1,
            sample_rate: spec.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )
    .expect("error creating output file");
    for s in &out.samples {
        wav.write_sample(s.round().clamp(-32768.0, 32767.0) as i16)
            .expect("error writing sample");
    }
    wav.finalize().expect("error finishing output file");

    if let Some(path) = args.text {
        let file = File::create(path).expect("error creating text file");
        write_text(&out.samples, BufWriter::new(file)).expect("error writing text file");
    }
}
