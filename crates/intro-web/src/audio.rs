use intro_engine::{stage_tones, SoundCues, Stage, Tone, Waveform};
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioScheduledSourceNode, OscillatorType};

/// Stage cues synthesized with Web Audio oscillators.
pub struct WebAudioCues {
    ctx: AudioContext,
}

impl WebAudioCues {
    /// `None` when the browser has no usable `AudioContext`.
    pub fn new() -> Option<Self> {
        match AudioContext::new() {
            Ok(ctx) => Some(Self { ctx }),
            Err(err) => {
                log::info!("Web Audio API not supported: {:?}", err);
                None
            }
        }
    }

    /// Schedule one tone on the audio clock.
    fn play_tone(&self, tone: &Tone) -> Result<(), JsValue> {
        let start = self.ctx.current_time() + tone.offset;
        let end = start + tone.duration;

        let osc = self.ctx.create_oscillator()?;
        let gain = self.ctx.create_gain()?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&self.ctx.destination())?;

        osc.set_type(oscillator_type(tone.waveform));
        osc.frequency().set_value_at_time(tone.frequency, start)?;

        let level = gain.gain();
        level.set_value_at_time(0.0, start)?;
        level.linear_ramp_to_value_at_time(tone.volume, start + Tone::ATTACK)?;
        level.exponential_ramp_to_value_at_time(Tone::FLOOR, end)?;

        let source: &AudioScheduledSourceNode = &osc;
        source.start_with_when(start)?;
        source.stop_with_when(end)?;
        Ok(())
    }
}

impl SoundCues for WebAudioCues {
    fn play_stage_sound(&mut self, stage: Stage) {
        for tone in stage_tones(stage) {
            if let Err(err) = self.play_tone(tone) {
                log::debug!("stage {} tone dropped: {:?}", stage.number(), err);
            }
        }
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}
