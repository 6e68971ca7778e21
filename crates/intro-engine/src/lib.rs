pub mod api;
pub mod core;
pub mod systems;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{IntroConfig, SkipBinding};
pub use api::error::SetupError;
pub use api::ports::{
    CompletionSink, LoadingSurface, SoundCues, StageEffects, StageKit, TextTarget, ThemeStore,
};
pub use api::theme::{Theme, ThemePreference, UnknownTheme, THEME_KEY};
pub use api::types::{CompletionPath, RevealField, Stage, StageEffect, TOTAL_STAGES};
pub use core::rng::{RandomSource, Rng};
pub use core::time::Countdown;
pub use input::queue::{InputEvent, InputQueue};
pub use systems::scramble::{
    CharSlot, ScrambleFrame, ScrambleHandle, ScrambleStatus, ScrambleTask, Segment, TextScrambler,
};
pub use systems::sequencer::{LoadingSession, Phase, RevealCopy, StageSequencer, FALLBACK_DELAY_MS};
pub use systems::sound::{stage_tones, Tone, Waveform};
