//! Tone recipes for stage cues.
//!
//! Each stage cue is a short run of synthesized tones. Hosts turn a [`Tone`]
//! into an oscillator with a 10 ms linear attack and an exponential decay to
//! [`Tone::FLOOR`] over its duration.

use crate::api::types::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz.
    pub frequency: f32,
    /// Length in seconds.
    pub duration: f64,
    pub waveform: Waveform,
    /// Peak gain after the attack.
    pub volume: f32,
    /// Start offset from the cue in seconds.
    pub offset: f64,
}

impl Tone {
    /// Attack length in seconds.
    pub const ATTACK: f64 = 0.01;
    /// Gain at the end of the decay. Exponential ramps cannot reach zero.
    pub const FLOOR: f32 = 0.001;

    const fn new(frequency: f32, duration: f64, waveform: Waveform, volume: f32, offset: f64) -> Self {
        Self {
            frequency,
            duration,
            waveform,
            volume,
            offset,
        }
    }
}

const LOGO: [Tone; 3] = [
    Tone::new(800.0, 0.3, Waveform::Sine, 0.15, 0.0),
    Tone::new(1000.0, 0.2, Waveform::Sine, 0.1, 0.15),
    Tone::new(1200.0, 0.2, Waveform::Sine, 0.08, 0.3),
];

const IDENTITY: [Tone; 1] = [Tone::new(600.0, 0.8, Waveform::Sawtooth, 0.05, 0.0)];

const ENVIRONMENT: [Tone; 1] = [Tone::new(400.0, 0.5, Waveform::Triangle, 0.08, 0.0)];

const COMPILE: [Tone; 1] = [Tone::new(1000.0, 0.1, Waveform::Square, 0.03, 0.0)];

const WELCOME: [Tone; 3] = [
    Tone::new(300.0, 1.0, Waveform::Sine, 0.12, 0.0),
    Tone::new(400.0, 0.8, Waveform::Sine, 0.1, 0.2),
    Tone::new(500.0, 0.6, Waveform::Sine, 0.08, 0.4),
];

/// Tones making up a stage's cue, in start order.
pub fn stage_tones(stage: Stage) -> &'static [Tone] {
    match stage {
        Stage::Logo => &LOGO,
        Stage::Identity => &IDENTITY,
        Stage::Environment => &ENVIRONMENT,
        Stage::Compile => &COMPILE,
        Stage::Welcome => &WELCOME,
    }
}
