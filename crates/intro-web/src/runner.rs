use intro_engine::{
    InputEvent, InputQueue, LoadingSession, Phase, SetupError, SkipBinding, StageKit,
    StageSequencer,
};

/// Owns the loading session for one page load and drives it from the
/// browser's animation frames.
///
/// The page bootstrap holds exactly one runner (in a `thread_local!`, because
/// wasm-bindgen cannot export a stateful struct with trait-object fields) and
/// forwards frame ticks and key presses to it.
pub struct IntroRunner {
    sequencer: StageSequencer,
    input: InputQueue,
    skip: SkipBinding,
    /// The skip binding is live only on development hosts.
    skip_enabled: bool,
}

impl IntroRunner {
    pub fn new(sequencer: StageSequencer, skip: SkipBinding, host: &str) -> Self {
        let skip_enabled = skip.is_active_on(host);
        if skip_enabled {
            log::info!("dev host {}: skip keys {:?} enabled", host, skip.keys);
        }
        Self {
            sequencer,
            input: InputQueue::new(),
            skip,
            skip_enabled,
        }
    }

    /// Start the sequence with the outcome of setup. Call once.
    pub fn start(&mut self, setup: Result<StageKit, SetupError>) {
        self.sequencer.start(setup);
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: apply queued input, then advance the sequence.
    pub fn tick(&mut self, dt_ms: f64) {
        for event in self.input.drain() {
            if self.is_skip(&event) {
                self.sequencer.skip();
            }
        }
        self.sequencer.tick(dt_ms);
    }

    fn is_skip(&self, event: &InputEvent) -> bool {
        if !self.skip_enabled {
            return false;
        }
        match event {
            InputEvent::KeyDown { key } => self.skip.matches_key(key),
            InputEvent::Skip => true,
        }
    }

    pub fn skip_enabled(&self) -> bool {
        self.skip_enabled
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    pub fn session(&self) -> &LoadingSession {
        self.sequencer.session()
    }
}
