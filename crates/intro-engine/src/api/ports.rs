use crate::api::types::{CompletionPath, RevealField, Stage, StageEffect};
use crate::systems::scramble::{ScrambleFrame, TextScrambler};

/// Loading-screen chrome owned by the sequencer: progress bar, stage panels,
/// exit and fallback containers.
pub trait LoadingSurface {
    /// Update the progress bar and its status line.
    fn set_progress(&mut self, percent: f64, status: &str);

    /// Hide the previous stage panel and activate the next one.
    fn transition_stage(&mut self, from: Stage, to: Stage);

    /// Play the exit of the staged screen, hide it and unlock page scrolling.
    fn play_exit(&mut self);

    /// Hide the staged loading UI.
    fn hide_staged_ui(&mut self);

    /// Show the minimal loading indicator used by the fallback path.
    fn show_fallback_indicator(&mut self);

    /// Hide the minimal indicator and unlock page scrolling.
    fn finish_fallback(&mut self);
}

/// Visual effects owned by the page's rendering layer.
/// Calls are fire-and-forget; implementations swallow their own failures.
pub trait StageEffects {
    fn trigger(&mut self, effect: StageEffect);
}

/// Best-effort audio cues. Must never fail.
pub trait SoundCues {
    fn play_stage_sound(&mut self, stage: Stage);
}

/// Receives the page-wide completion signal.
pub trait CompletionSink {
    fn loading_complete(&mut self, path: CompletionPath);
}

/// A text node driven by a [`TextScrambler`].
pub trait TextTarget {
    /// Currently displayed text, scramble glyphs included.
    fn text(&self) -> String;

    /// Replace the displayed content with one scramble frame.
    fn render(&mut self, frame: &ScrambleFrame);
}

/// Key-value storage for user preferences.
pub trait ThemeStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// Everything the staged experience needs beyond the loading surface.
/// Built once during setup; a setup error means there is no kit and the
/// sequencer falls back.
pub struct StageKit {
    /// `None` when audio is unavailable.
    pub sounds: Option<Box<dyn SoundCues>>,
    pub effects: Box<dyn StageEffects>,
    pub name: TextScrambler,
    pub role: TextScrambler,
}

impl StageKit {
    pub fn scrambler_mut(&mut self, field: RevealField) -> &mut TextScrambler {
        match field {
            RevealField::Name => &mut self.name,
            RevealField::Role => &mut self.role,
        }
    }
}
