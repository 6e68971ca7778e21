//! Five-stage loading timeline.
//!
//! A single tick advances one state machine holding `(phase, dwell)`. Stage
//! entry runs its side effects in a fixed order (panel swap, progress, sound,
//! visual hand-off, reveal scheduling) and only then arms the dwell
//! countdown. Skip and the setup-failure fallback share the completion path,
//! which fires at most once per session.

use crate::api::error::SetupError;
use crate::api::ports::{CompletionSink, LoadingSurface, StageKit};
use crate::api::types::{CompletionPath, RevealField, Stage, TOTAL_STAGES};
use crate::core::time::Countdown;

/// Time the basic indicator stays up before completion on the fallback path.
pub const FALLBACK_DELAY_MS: f64 = 2000.0;

/// Where the sequencer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running(Stage),
    Complete(CompletionPath),
    /// Setup failed. Terminal; the fallback indicator is showing.
    Failed,
}

impl Phase {
    pub fn stage(self) -> Option<Stage> {
        match self {
            Phase::Running(stage) => Some(stage),
            _ => None,
        }
    }
}

/// Per-page-load progress record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingSession {
    current_stage: u8,
    is_complete: bool,
}

impl LoadingSession {
    pub const TOTAL_STAGES: u8 = TOTAL_STAGES;

    /// 0 before the first stage, then 1..=5.
    pub fn current_stage(&self) -> u8 {
        self.current_stage
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    fn enter(&mut self, stage: Stage) {
        debug_assert!(!self.is_complete, "stage entered after completion");
        debug_assert!(stage.number() >= self.current_stage, "stage moved backwards");
        self.current_stage = stage.number();
    }

    /// Returns true only the first time.
    fn mark_complete(&mut self) -> bool {
        !std::mem::replace(&mut self.is_complete, true)
    }
}

/// Copy revealed by the scramblers during stage 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealCopy {
    pub name: String,
    pub role: String,
}

impl RevealCopy {
    fn text(&self, field: RevealField) -> &str {
        match field {
            RevealField::Name => &self.name,
            RevealField::Role => &self.role,
        }
    }
}

#[derive(Debug)]
struct PendingReveal {
    field: RevealField,
    delay: Countdown,
}

pub struct StageSequencer {
    session: LoadingSession,
    phase: Phase,
    dwell: Countdown,
    fallback: Option<Countdown>,
    pending: Vec<PendingReveal>,
    copy: RevealCopy,
    surface: Box<dyn LoadingSurface>,
    completion: Box<dyn CompletionSink>,
    kit: Option<StageKit>,
}

impl StageSequencer {
    pub fn new(
        surface: Box<dyn LoadingSurface>,
        completion: Box<dyn CompletionSink>,
        copy: RevealCopy,
    ) -> Self {
        Self {
            session: LoadingSession::default(),
            phase: Phase::Idle,
            dwell: Countdown::new(0.0),
            fallback: None,
            pending: Vec::new(),
            copy,
            surface,
            completion,
            kit: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &LoadingSession {
        &self.session
    }

    pub fn kit(&self) -> Option<&StageKit> {
        self.kit.as_ref()
    }

    /// Begin the sequence with the result of setup.
    /// A setup error enters the fallback path instead of stage 1.
    pub fn start(&mut self, setup: Result<StageKit, SetupError>) {
        if self.phase != Phase::Idle {
            log::warn!("intro already started ({:?}); ignoring start", self.phase);
            return;
        }

        match setup {
            Ok(kit) => {
                if kit.sounds.is_none() {
                    log::info!("audio unavailable; stage sounds disabled");
                }
                self.kit = Some(kit);
                self.enter_stage(Stage::Logo);
            }
            Err(err) => self.fail(err),
        }
    }

    /// Advance by one animation frame of `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: f64) {
        match self.phase {
            Phase::Running(_) => {
                // Scramblers first: a reveal started below renders its own
                // frame 0 and must not advance again this frame.
                if let Some(kit) = self.kit.as_mut() {
                    kit.name.tick();
                    kit.role.tick();
                }
                self.run_stages(dt_ms);
            }
            Phase::Failed => {
                let expired = self
                    .fallback
                    .as_mut()
                    .map_or(false, |delay| delay.advance(dt_ms));
                if expired {
                    self.fallback = None;
                    self.surface.finish_fallback();
                    self.emit_completion(CompletionPath::Fallback);
                }
            }
            Phase::Idle | Phase::Complete(_) => {}
        }
    }

    /// Jump straight to completion. No-op once complete or failed.
    /// Returns true if the skip took effect.
    pub fn skip(&mut self) -> bool {
        match self.phase {
            Phase::Complete(_) | Phase::Failed => false,
            Phase::Idle | Phase::Running(_) => {
                log::info!("skip requested at stage {}", self.session.current_stage());
                self.complete(CompletionPath::Skipped);
                true
            }
        }
    }

    fn run_stages(&mut self, dt_ms: f64) {
        let mut budget = dt_ms;
        while let Phase::Running(stage) = self.phase {
            self.fire_due_reveals(budget);
            if !self.dwell.advance(budget) {
                break;
            }
            budget = self.dwell.overshoot_ms();
            match stage.next() {
                Some(next) => self.enter_stage(next),
                None => self.complete(CompletionPath::Natural),
            }
        }
    }

    fn enter_stage(&mut self, stage: Stage) {
        if let Some(previous) = self.phase.stage() {
            self.surface.transition_stage(previous, stage);
        }
        self.session.enter(stage);
        self.phase = Phase::Running(stage);
        log::info!("stage {}: {}", stage.number(), stage.status_label());

        self.surface
            .set_progress(stage.progress_percent(), stage.status_label());

        if let Some(kit) = self.kit.as_mut() {
            if let Some(sounds) = kit.sounds.as_mut() {
                sounds.play_stage_sound(stage);
            }
            kit.effects.trigger(stage.effect());
        }

        self.pending = stage
            .reveals()
            .iter()
            .map(|&(field, at_ms)| PendingReveal {
                field,
                delay: Countdown::new(at_ms),
            })
            .collect();

        self.dwell = Countdown::new(stage.dwell_ms());
    }

    fn fire_due_reveals(&mut self, dt_ms: f64) {
        if self.pending.is_empty() {
            return;
        }
        let Some(kit) = self.kit.as_mut() else {
            self.pending.clear();
            return;
        };

        let copy = &self.copy;
        self.pending.retain_mut(|reveal| {
            if !reveal.delay.advance(dt_ms) {
                return true;
            }
            let text = copy.text(reveal.field);
            log::debug!("revealing {:?}: {}", reveal.field, text);
            kit.scrambler_mut(reveal.field).set_text(text);
            false
        });
    }

    fn fail(&mut self, err: SetupError) {
        log::error!("staged intro setup failed: {}; falling back to basic loading", err);
        self.phase = Phase::Failed;
        self.surface.hide_staged_ui();
        self.surface.show_fallback_indicator();
        self.fallback = Some(Countdown::new(FALLBACK_DELAY_MS));
    }

    fn complete(&mut self, path: CompletionPath) {
        if self.session.is_complete() {
            return;
        }
        self.phase = Phase::Complete(path);
        self.pending.clear();
        if let Some(kit) = self.kit.as_mut() {
            kit.name.cancel();
            kit.role.cancel();
        }
        self.surface.play_exit();
        self.emit_completion(path);
    }

    fn emit_completion(&mut self, path: CompletionPath) {
        if !self.session.mark_complete() {
            return;
        }
        log::info!("loading complete ({})", path.name());
        self.completion.loading_complete(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ports::{SoundCues, StageEffects};
    use crate::api::types::StageEffect;
    use crate::core::rng::Rng;
    use crate::systems::scramble::testing::RecordingText;
    use crate::systems::scramble::TextScrambler;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Transition(u8, u8),
        Progress(f64, String),
        Sound(u8),
        Effect(StageEffect),
        Exit,
        HideStaged,
        ShowFallback,
        FinishFallback,
        Complete(CompletionPath),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct Recorder(Log);

    impl LoadingSurface for Recorder {
        fn set_progress(&mut self, percent: f64, status: &str) {
            self.0.borrow_mut().push(Call::Progress(percent, status.to_string()));
        }
        fn transition_stage(&mut self, from: Stage, to: Stage) {
            self.0.borrow_mut().push(Call::Transition(from.number(), to.number()));
        }
        fn play_exit(&mut self) {
            self.0.borrow_mut().push(Call::Exit);
        }
        fn hide_staged_ui(&mut self) {
            self.0.borrow_mut().push(Call::HideStaged);
        }
        fn show_fallback_indicator(&mut self) {
            self.0.borrow_mut().push(Call::ShowFallback);
        }
        fn finish_fallback(&mut self) {
            self.0.borrow_mut().push(Call::FinishFallback);
        }
    }

    impl CompletionSink for Recorder {
        fn loading_complete(&mut self, path: CompletionPath) {
            self.0.borrow_mut().push(Call::Complete(path));
        }
    }

    impl SoundCues for Recorder {
        fn play_stage_sound(&mut self, stage: Stage) {
            self.0.borrow_mut().push(Call::Sound(stage.number()));
        }
    }

    impl StageEffects for Recorder {
        fn trigger(&mut self, effect: StageEffect) {
            self.0.borrow_mut().push(Call::Effect(effect));
        }
    }

    struct Harness {
        log: Log,
        name: RecordingText,
        role: RecordingText,
        seq: StageSequencer,
    }

    impl Harness {
        fn new() -> Self {
            let log: Log = Rc::default();
            let seq = StageSequencer::new(
                Box::new(Recorder(log.clone())),
                Box::new(Recorder(log.clone())),
                RevealCopy {
                    name: "KYLE EURIE".to_string(),
                    role: "DEVELOPER".to_string(),
                },
            );
            Self {
                log,
                name: RecordingText::default(),
                role: RecordingText::default(),
                seq,
            }
        }

        fn kit(&self, with_sound: bool) -> StageKit {
            StageKit {
                sounds: if with_sound {
                    Some(Box::new(Recorder(self.log.clone())))
                } else {
                    None
                },
                effects: Box::new(Recorder(self.log.clone())),
                name: TextScrambler::new(Box::new(self.name.clone()), Box::new(Rng::new(1))),
                role: TextScrambler::new(Box::new(self.role.clone()), Box::new(Rng::new(2))),
            }
        }

        fn start(&mut self, with_sound: bool) {
            let kit = self.kit(with_sound);
            self.seq.start(Ok(kit));
        }

        fn run_for(&mut self, ms: f64) {
            let frames = (ms / FRAME_MS).ceil() as u32;
            for _ in 0..frames {
                self.seq.tick(FRAME_MS);
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.log.borrow().clone()
        }

        fn completions(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Complete(_)))
                .count()
        }

        fn sounds(&self) -> Vec<u8> {
            self.calls()
                .iter()
                .filter_map(|c| match c {
                    Call::Sound(n) => Some(*n),
                    _ => None,
                })
                .collect()
        }
    }

    #[test]
    fn natural_path_visits_every_stage_in_order() {
        let mut h = Harness::new();
        h.start(true);

        let mut seen = vec![h.seq.session().current_stage()];
        for _ in 0..((20_000.0 / FRAME_MS) as u32) {
            h.seq.tick(FRAME_MS);
            let stage = h.seq.session().current_stage();
            assert!(stage >= *seen.last().unwrap(), "stage went backwards");
            if stage != *seen.last().unwrap() {
                seen.push(stage);
            }
        }

        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(h.seq.phase(), Phase::Complete(CompletionPath::Natural));
        assert_eq!(h.sounds(), vec![1, 2, 3, 4, 5]);
        assert_eq!(h.completions(), 1);
        assert!(h.seq.session().is_complete());
    }

    #[test]
    fn stage_entry_runs_effects_in_order() {
        let mut h = Harness::new();
        h.start(true);
        h.seq.tick(3000.0);

        assert_eq!(
            h.calls(),
            vec![
                Call::Progress(0.0, "Initializing...".to_string()),
                Call::Sound(1),
                Call::Effect(StageEffect::LogoBurst),
                Call::Transition(1, 2),
                Call::Progress(20.0, "Loading identity...".to_string()),
                Call::Sound(2),
                Call::Effect(StageEffect::NameParticles),
            ]
        );
    }

    #[test]
    fn dwell_times_gate_each_transition() {
        let mut h = Harness::new();
        h.start(true);

        h.seq.tick(2999.0);
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Logo));
        h.seq.tick(1.0);
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Identity));
        h.seq.tick(3999.0);
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Identity));
        h.seq.tick(1.0);
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Environment));
        h.seq.tick(4000.0);
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Compile));
        h.seq.tick(4999.0);
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Compile));
        h.seq.tick(1.0);
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Welcome));
        h.seq.tick(2999.0);
        assert_eq!(h.completions(), 0);
        h.seq.tick(1.0);
        assert_eq!(h.seq.phase(), Phase::Complete(CompletionPath::Natural));
    }

    #[test]
    fn long_frame_carries_over_without_skipping_stages() {
        let mut h = Harness::new();
        h.start(false);
        h.seq.tick(7500.0);

        assert_eq!(h.seq.phase(), Phase::Running(Stage::Environment));
        let transitions: Vec<Call> = h
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Transition(..)))
            .collect();
        assert_eq!(transitions, vec![Call::Transition(1, 2), Call::Transition(2, 3)]);
        // Both reveals were due inside stage 2.
        assert!(!h.name.frames.borrow().is_empty());
        assert!(!h.role.frames.borrow().is_empty());
    }

    #[test]
    fn reveals_start_at_their_offsets() {
        let mut h = Harness::new();
        h.start(true);
        h.seq.tick(3000.0);

        h.seq.tick(499.0);
        assert!(h.name.frames.borrow().is_empty());
        h.seq.tick(1.0);
        assert_eq!(h.name.frames.borrow().len(), 1);
        assert!(h.role.frames.borrow().is_empty());

        h.seq.tick(999.0);
        assert!(h.role.frames.borrow().is_empty());
        h.seq.tick(1.0);
        assert_eq!(h.role.frames.borrow().len(), 1);

        h.run_for(2000.0);
        assert_eq!(h.name.shown(), "KYLE EURIE");
        assert_eq!(h.role.shown(), "DEVELOPER");
    }

    #[test]
    fn skip_mid_sequence_cancels_remaining_stages() {
        let mut h = Harness::new();
        h.start(true);
        h.run_for(3100.0);
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Identity));

        assert!(h.seq.skip());
        let after_skip = h.calls().len();
        assert_eq!(h.seq.phase(), Phase::Complete(CompletionPath::Skipped));
        assert_eq!(h.calls()[after_skip - 2..], [Call::Exit, Call::Complete(CompletionPath::Skipped)]);

        h.run_for(20_000.0);
        assert_eq!(h.calls().len(), after_skip, "side effects fired after skip");
        assert!(h.name.frames.borrow().is_empty(), "name reveal fired after skip");
        assert_eq!(h.seq.session().current_stage(), 2);
    }

    #[test]
    fn skip_after_completion_is_noop() {
        let mut h = Harness::new();
        h.start(true);
        assert!(h.seq.skip());
        assert!(!h.seq.skip());
        h.run_for(20_000.0);
        assert!(!h.seq.skip());
        assert_eq!(h.completions(), 1);
    }

    #[test]
    fn skip_cancels_in_flight_scramble() {
        let mut h = Harness::new();
        h.start(true);
        h.seq.tick(3000.0);
        h.seq.tick(500.0);
        assert!(h.seq.kit().map_or(false, |k| k.name.is_animating()));

        h.seq.skip();
        let frames = h.name.frames.borrow().len();
        h.run_for(2000.0);
        assert_eq!(h.name.frames.borrow().len(), frames);
        assert!(!h.seq.kit().map_or(true, |k| k.name.is_animating()));
    }

    #[test]
    fn missing_audio_is_silent() {
        let mut h = Harness::new();
        h.start(false);
        h.run_for(20_000.0);
        assert!(h.sounds().is_empty());
        assert_eq!(h.seq.phase(), Phase::Complete(CompletionPath::Natural));
        assert_eq!(h.completions(), 1);
    }

    #[test]
    fn setup_failure_falls_back_then_completes() {
        let mut h = Harness::new();
        h.seq
            .start(Err(SetupError::MissingElement("nameScramble".to_string())));

        assert_eq!(h.seq.phase(), Phase::Failed);
        assert_eq!(h.calls(), vec![Call::HideStaged, Call::ShowFallback]);

        h.seq.tick(1999.0);
        assert_eq!(h.completions(), 0);
        h.seq.tick(1.0);
        assert_eq!(
            h.calls(),
            vec![
                Call::HideStaged,
                Call::ShowFallback,
                Call::FinishFallback,
                Call::Complete(CompletionPath::Fallback),
            ]
        );

        h.run_for(5000.0);
        assert!(!h.seq.skip());
        assert_eq!(h.seq.phase(), Phase::Failed);
        assert_eq!(h.completions(), 1);
        assert_eq!(h.seq.session().current_stage(), 0);
        assert!(h.seq.session().is_complete());
    }

    #[test]
    fn skip_during_fallback_is_ignored() {
        let mut h = Harness::new();
        h.seq.start(Err(SetupError::Collaborator("no canvas".to_string())));
        assert!(!h.seq.skip());
        assert_eq!(h.completions(), 0);
        h.seq.tick(2000.0);
        assert_eq!(h.completions(), 1);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut h = Harness::new();
        h.start(true);
        h.seq.start(Err(SetupError::Collaborator("late".to_string())));
        assert_eq!(h.seq.phase(), Phase::Running(Stage::Logo));
    }
}
