//! LPC analysis-synthesis vocoder in Rust.
//!
//! A recording is split into overlapping windowed frames, each frame is modelled by an all-pole
//! filter plus a gain, and the models are then re-driven by a synthetic excitation built from a
//! pitch/duration annotation: impulse trains for sung notes, noise for unvoiced spans, silence
//! otherwise.
//!
//! *NOTE*: WAV decoding/encoding and resampling are left to the caller.
//! See `demos/resynthesize.rs` for a complete run using `hound`.
//!
//! ## `no_std`
//!
//! This library is `no_std` compatible when built with the `libm` feature instead of `std`.
//! `alloc` is required.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(
    clippy::all,
    clippy::cargo,
    clippy::pedantic,
    unsafe_code,
    rustdoc::all
)]
// fine for us since loss of precision/sign is not that imporatnt, as long as it's the same every time.
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

#[cfg(all(feature = "std", feature = "libm"))]
compile_error!("Features \"std\" and \"libm\" are mutually exclusive.");

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("Must specify a math feature: either \"std\" or \"libm\".");

extern crate alloc;

mod traits;
pub use traits::BasicFilter;
mod annotation;
mod error;
mod excitation;
mod filter;
mod frame;
mod lpc;
mod math;
mod normalize;
mod synthesis;
mod vocoder;

pub use annotation::{AnnotationRecord, Note, PitchTable, parse_annotation};
pub use error::{AnnotationErrorKind, VocoderError, VocoderResult};
pub use excitation::{
    ExcitationSegment, SegmentPlacement, Voicing, generate_excitation, pitch_period,
    segments_from_records,
};
pub use filter::{AllPoleFilter, DeEmphasis, PreEmphasis, de_emphasize, pre_emphasize};
pub use frame::{Frame, FrameGrid, Frames, Window, WindowKind};
pub use lpc::{
    Analysis, FrameFault, LpcModel, analyze, analyze_frame, autocorrelation, levinson_durbin,
};
#[cfg(feature = "std")]
pub use normalize::write_text;
pub use normalize::normalize;
pub use synthesis::{
    FrameContribution, SynthesisPlan, Truncation, contributions, overlap_add, render_frame,
    synthesize,
};
pub use vocoder::{
    Resynthesis, Signal, VocoderParms, analyze_signal, render, resynthesize,
};

#[cfg(test)]
mod lib_tests;
