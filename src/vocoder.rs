use crate::annotation::{PitchTable, parse_annotation};
use crate::error::{VocoderError, VocoderResult};
use crate::excitation::{SegmentPlacement, generate_excitation, segments_from_records};
use crate::filter::{de_emphasize, pre_emphasize};
use crate::frame::{FrameGrid, Window, WindowKind};
use crate::lpc::{Analysis, LpcModel, analyze};
use crate::normalize::normalize;
use crate::synthesis::{SynthesisPlan, synthesize};
use alloc::{format, vec::Vec};
use rand::Rng;
use tracing::info;

/// A mono recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Sample rate in Hz.
    pub sample_rate: usize,
    pub samples: Vec<f64>,
}

/// Vocoder settings. The defaults are 30 ms Hamming frames every 5 ms, order 16 prediction
/// and 0.95 pre-emphasis.
#[derive(Debug, Clone, PartialEq)]
pub struct VocoderParms {
    /// Frame length in milliseconds.
    pub window_ms: usize,
    /// Frame hop in milliseconds.
    pub step_ms: usize,
    /// Prediction order.
    pub order: usize,
    /// Pre-emphasis coefficient, undone after synthesis.
    pub pre_emphasis: f64,
    pub window: WindowKind,
    pub pitch_table: PitchTable,
    pub placement: SegmentPlacement,
    /// Full width of the unvoiced noise, centred on zero.
    pub unvoiced_amplitude: f64,
    /// Value the output peak is scaled to.
    pub peak_level: f64,
}
impl Default for VocoderParms {
    fn default() -> Self {
        VocoderParms {
            window_ms: 30,
            step_ms: 5,
            order: 16,
            pre_emphasis: 0.95,
            window: WindowKind::Hamming,
            pitch_table: PitchTable::V2,
            placement: SegmentPlacement::Absolute,
            unvoiced_amplitude: 0.05,
            peak_level: 10000.0,
        }
    }
}
impl VocoderParms {
    /// Checks the settings against a sample rate and derives the frame grid.
    ///
    /// # Errors
    ///
    /// [`VocoderError::InvalidParms`] naming the first bad setting.
    pub fn grid(&self, sample_rate: usize) -> VocoderResult<FrameGrid> {
        if sample_rate == 0 {
            return Err(VocoderError::invalid_parm("sample_rate", "must be positive"));
        }
        if self.order == 0 {
            return Err(VocoderError::invalid_parm("order", "must be at least 1"));
        }
        if !(self.pre_emphasis.is_finite() && self.pre_emphasis.abs() < 1.0) {
            return Err(VocoderError::invalid_parm(
                "pre_emphasis",
                format!("{} does not give a stable de-emphasis filter", self.pre_emphasis),
            ));
        }
        if !(self.unvoiced_amplitude.is_finite() && self.unvoiced_amplitude >= 0.0) {
            return Err(VocoderError::invalid_parm(
                "unvoiced_amplitude",
                format!("{} is not a usable amplitude", self.unvoiced_amplitude),
            ));
        }
        if !(self.peak_level.is_finite() && self.peak_level > 0.0) {
            return Err(VocoderError::invalid_parm(
                "peak_level",
                format!("{} is not a usable level", self.peak_level),
            ));
        }
        FrameGrid::new(
            self.window_ms * sample_rate / 1000,
            self.step_ms * sample_rate / 1000,
        )
    }
}

/// The result of a full analysis-synthesis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resynthesis {
    pub sample_rate: usize,
    /// De-emphasized output scaled so its peak equals `peak_level`.
    pub samples: Vec<f64>,
    pub plan: SynthesisPlan,
    /// Analysis frames that were replaced by the neutral model.
    pub degenerate_frames: Vec<usize>,
}

/// Pre-emphasizes `signal` and fits one all-pole model per frame.
///
/// # Errors
///
/// [`VocoderError::InvalidParms`] if `parms` do not fit the sample rate.
pub fn analyze_signal(parms: &VocoderParms, signal: &Signal) -> VocoderResult<Analysis> {
    let grid = parms.grid(signal.sample_rate)?;
    let emphasized = pre_emphasize(&signal.samples, parms.pre_emphasis);
    let window = Window::new(parms.window, grid.frame_len());
    Ok(analyze(&emphasized, grid, window, parms.order))
}

/// Drives frame models with an excitation, then de-emphasizes and normalizes.
///
/// # Errors
///
/// [`VocoderError::DegenerateOutput`] if nothing audible was synthesized.
pub fn render(
    parms: &VocoderParms,
    grid: FrameGrid,
    window: &Window,
    models: &[LpcModel],
    excitation: &[f64],
) -> VocoderResult<(Vec<f64>, SynthesisPlan)> {
    let (synth, plan) = synthesize(grid, window, models, excitation);
    let samples = normalize(&de_emphasize(&synth, parms.pre_emphasis), parms.peak_level)?;
    Ok((samples, plan))
}

/// Analyses `signal` and resynthesizes it with the excitation described by `annotation`.
///
/// # Errors
///
/// Bad parameters, a malformed annotation, or a silent result.
pub fn resynthesize<R: Rng>(
    parms: &VocoderParms,
    signal: &Signal,
    annotation: &str,
    rng: &mut R,
) -> VocoderResult<Resynthesis> {
    let analysis = analyze_signal(parms, signal)?;
    let records = parse_annotation(annotation)?;
    let segments = segments_from_records(
        &records,
        signal.sample_rate,
        parms.pitch_table,
        parms.placement,
    )?;
    let excitation = generate_excitation(
        &segments,
        signal.sample_rate,
        parms.unvoiced_amplitude,
        rng,
    );
    let (samples, plan) = render(
        parms,
        analysis.grid,
        &analysis.window,
        &analysis.models,
        &excitation,
    )?;
    info!(
        sample_rate = signal.sample_rate,
        input = signal.samples.len(),
        output = samples.len(),
        "resynthesis done"
    );
    Ok(Resynthesis {
        sample_rate: signal.sample_rate,
        samples,
        plan,
        degenerate_frames: analysis.degenerate_frames,
    })
}
