/// Number of stages in the loading presentation.
pub const TOTAL_STAGES: u8 = 5;

/// One phase of the loading presentation.
/// Discriminants are the 1-based stage numbers used by the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Logo burst.
    Logo = 1,
    /// Name and role scramble.
    Identity = 2,
    /// Geometry and tech-stack reveal.
    Environment = 3,
    /// Code typing and stat counters.
    Compile = 4,
    /// Portal and welcome text.
    Welcome = 5,
}

impl Stage {
    pub const ALL: [Stage; TOTAL_STAGES as usize] = [
        Stage::Logo,
        Stage::Identity,
        Stage::Environment,
        Stage::Compile,
        Stage::Welcome,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Stage> {
        match n {
            1 => Some(Stage::Logo),
            2 => Some(Stage::Identity),
            3 => Some(Stage::Environment),
            4 => Some(Stage::Compile),
            5 => Some(Stage::Welcome),
            _ => None,
        }
    }

    /// The stage that follows this one on the natural path.
    pub fn next(self) -> Option<Stage> {
        Stage::from_number(self.number() + 1)
    }

    /// How long the stage stays active, measured from stage entry.
    pub fn dwell_ms(self) -> f64 {
        match self {
            Stage::Logo => 3000.0,
            Stage::Identity => 4000.0,
            Stage::Environment => 4000.0,
            Stage::Compile => 5000.0,
            Stage::Welcome => 3000.0,
        }
    }

    /// Progress bar value shown on stage entry.
    /// Stage k shows (k-1)/TOTAL_STAGES; the final stage always shows 100.
    pub fn progress_percent(self) -> f64 {
        match self {
            Stage::Welcome => 100.0,
            _ => (self.number() - 1) as f64 / TOTAL_STAGES as f64 * 100.0,
        }
    }

    pub fn status_label(self) -> &'static str {
        match self {
            Stage::Logo => "Initializing...",
            Stage::Identity => "Loading identity...",
            Stage::Environment => "Building environment...",
            Stage::Compile => "Compiling code...",
            Stage::Welcome => "Welcome aboard!",
        }
    }

    /// Visual hand-off fired when the stage is entered.
    pub fn effect(self) -> StageEffect {
        match self {
            Stage::Logo => StageEffect::LogoBurst,
            Stage::Identity => StageEffect::NameParticles,
            Stage::Environment => StageEffect::GeometryReveal,
            Stage::Compile => StageEffect::CodeTyping,
            Stage::Welcome => StageEffect::PortalExit,
        }
    }

    /// Text reveals scheduled inside the stage, as (field, offset from entry).
    pub fn reveals(self) -> &'static [(RevealField, f64)] {
        match self {
            Stage::Identity => &[(RevealField::Name, 500.0), (RevealField::Role, 1500.0)],
            _ => &[],
        }
    }
}

/// Fire-and-forget visual effects owned by the page's rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageEffect {
    LogoBurst,
    NameParticles,
    GeometryReveal,
    CodeTyping,
    PortalExit,
}

impl StageEffect {
    /// Kebab-case name, used as the DOM event suffix.
    pub fn name(self) -> &'static str {
        match self {
            StageEffect::LogoBurst => "logo-burst",
            StageEffect::NameParticles => "name-particles",
            StageEffect::GeometryReveal => "geometry-reveal",
            StageEffect::CodeTyping => "code-typing",
            StageEffect::PortalExit => "portal-exit",
        }
    }
}

/// Text fields revealed by the scrambler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealField {
    Name,
    Role,
}

/// How the loading sequence reached completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionPath {
    /// Stage 5 dwell ran out.
    Natural,
    /// Skip requested before the end.
    Skipped,
    /// Setup failed; the basic indicator was shown instead.
    Fallback,
}

impl CompletionPath {
    pub fn name(self) -> &'static str {
        match self {
            CompletionPath::Natural => "natural",
            CompletionPath::Skipped => "skipped",
            CompletionPath::Fallback => "fallback",
        }
    }
}
