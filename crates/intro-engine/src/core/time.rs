/// One-shot delay in milliseconds, advanced by frame time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    /// Total delay.
    duration_ms: f64,
    /// Time accumulated since the countdown was armed.
    elapsed_ms: f64,
}

impl Countdown {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Add frame time. Returns true once the delay has run out.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        self.elapsed_ms += dt_ms.max(0.0);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Time past the deadline (0.0 while still running).
    pub fn overshoot_ms(&self) -> f64 {
        (self.elapsed_ms - self.duration_ms).max(0.0)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}
