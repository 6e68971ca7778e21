//! Character-scramble text reveal.
//!
//! `set_text` builds one [`CharSlot`] per character position. Each slot shows
//! its old character until `reveal_frame`, flickers through random glyphs
//! until `lock_frame`, then settles on the new character. One frame is
//! rendered per animation tick; the task ends once every slot has locked.
//!
//! ```text
//!  frame:   0 .. reveal_frame .. lock_frame ..
//!  shows:   from    | glyph (held, 28% redraw) |  to
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::api::ports::TextTarget;
use crate::core::rng::RandomSource;

/// Glyphs drawn for characters that are still scrambling.
/// Underscores are repeated on purpose to weight the draw toward them.
pub const SCRAMBLE_GLYPHS: [char; 26] = [
    '!', '<', '>', '-', '_', '\\', '/', '[', ']', '{', '}', '—', '=', '+', '*', '^', '?', '#',
    '_', '_', '_', '_', '_', '_', '_', '_',
];

/// Reveal frames and lock offsets are each drawn from [0, FRAME_WINDOW).
pub const FRAME_WINDOW: u32 = 40;

/// Per-tick chance that a scrambling slot swaps its held glyph.
pub const REDRAW_CHANCE: f64 = 0.28;

/// One character position in a scramble task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSlot {
    /// Character shown before reveal (`None` past the end of the old text).
    pub from: Option<char>,
    /// Character shown once locked (`None` past the end of the new text).
    pub to: Option<char>,
    pub reveal_frame: u32,
    /// Always `>= reveal_frame`.
    pub lock_frame: u32,
    /// Glyph currently held while scrambling.
    pub glyph: Option<char>,
}

/// A rendered piece of scramble output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Unrevealed or locked character.
    Plain(char),
    /// Random glyph for a character still scrambling.
    Scrambling(char),
}

/// The output of one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrambleFrame {
    /// Frame counter this output was rendered at.
    pub frame: u32,
    pub segments: Vec<Segment>,
    /// Number of slots that have locked.
    pub locked: usize,
    /// Total number of slots in the task.
    pub total: usize,
}

impl ScrambleFrame {
    pub fn is_complete(&self) -> bool {
        self.locked == self.total
    }

    /// Displayed text without markup, glyphs included.
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| match *s {
                Segment::Plain(c) | Segment::Scrambling(c) => c,
            })
            .collect()
    }

    /// HTML with scrambling glyphs wrapped in `span.scramble-char`.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.segments.len() * 4);
        for segment in &self.segments {
            match *segment {
                Segment::Plain(c) => push_escaped(&mut out, c),
                Segment::Scrambling(c) => {
                    out.push_str("<span class=\"scramble-char\">");
                    push_escaped(&mut out, c);
                    out.push_str("</span>");
                }
            }
        }
        out
    }
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrambleStatus {
    Running,
    /// Every character locked to the target.
    Resolved,
    /// Replaced by a newer `set_text` (or cancelled) before resolving.
    Cancelled,
}

/// Completion handle returned by [`TextScrambler::set_text`].
/// Settles exactly once: resolved when the queue locks, or cancelled.
#[derive(Debug, Clone)]
pub struct ScrambleHandle {
    status: Rc<Cell<ScrambleStatus>>,
}

impl ScrambleHandle {
    pub fn status(&self) -> ScrambleStatus {
        self.status.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.status.get() == ScrambleStatus::Resolved
    }

    pub fn is_settled(&self) -> bool {
        self.status.get() != ScrambleStatus::Running
    }
}

/// One run of the reveal, from the text on screen to a target.
#[derive(Debug)]
pub struct ScrambleTask {
    queue: Vec<CharSlot>,
    frame: u32,
    status: Rc<Cell<ScrambleStatus>>,
}

impl ScrambleTask {
    pub fn new(current: &str, target: &str, rng: &mut dyn RandomSource) -> Self {
        let from: Vec<char> = current.chars().collect();
        let to: Vec<char> = target.chars().collect();
        let length = from.len().max(to.len());

        let queue = (0..length)
            .map(|i| {
                let reveal_frame = rng.next_int(FRAME_WINDOW);
                let lock_frame = reveal_frame + rng.next_int(FRAME_WINDOW);
                CharSlot {
                    from: from.get(i).copied(),
                    to: to.get(i).copied(),
                    reveal_frame,
                    lock_frame,
                    glyph: None,
                }
            })
            .collect();

        Self {
            queue,
            frame: 0,
            status: Rc::new(Cell::new(ScrambleStatus::Running)),
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn slots(&self) -> &[CharSlot] {
        &self.queue
    }

    pub fn handle(&self) -> ScrambleHandle {
        ScrambleHandle {
            status: Rc::clone(&self.status),
        }
    }

    /// Render the current frame. Does not advance the counter.
    pub fn render(&mut self, rng: &mut dyn RandomSource) -> ScrambleFrame {
        let frame = self.frame;
        let mut segments = Vec::with_capacity(self.queue.len());
        let mut locked = 0;

        for slot in &mut self.queue {
            if frame >= slot.lock_frame {
                locked += 1;
                segments.extend(slot.to.map(Segment::Plain));
            } else if frame >= slot.reveal_frame {
                let glyph = match slot.glyph {
                    Some(held) if rng.next_unit() >= REDRAW_CHANCE => held,
                    _ => random_glyph(rng),
                };
                slot.glyph = Some(glyph);
                segments.push(Segment::Scrambling(glyph));
            } else {
                segments.extend(slot.from.map(Segment::Plain));
            }
        }

        ScrambleFrame {
            frame,
            segments,
            locked,
            total: self.queue.len(),
        }
    }

    fn settle(&self, status: ScrambleStatus) {
        if self.status.get() == ScrambleStatus::Running {
            self.status.set(status);
        }
    }
}

fn random_glyph(rng: &mut dyn RandomSource) -> char {
    SCRAMBLE_GLYPHS[rng.next_int(SCRAMBLE_GLYPHS.len() as u32) as usize]
}

/// Drives scramble reveals on a single text node.
/// At most one task is active; starting another cancels the first.
pub struct TextScrambler {
    target: Box<dyn TextTarget>,
    rng: Box<dyn RandomSource>,
    task: Option<ScrambleTask>,
}

impl TextScrambler {
    pub fn new(target: Box<dyn TextTarget>, rng: Box<dyn RandomSource>) -> Self {
        Self {
            target,
            rng,
            task: None,
        }
    }

    /// Start revealing `text`, replacing any in-flight reveal.
    /// Frame 0 is rendered immediately.
    pub fn set_text(&mut self, text: &str) -> ScrambleHandle {
        self.cancel();

        let current = self.target.text();
        let task = ScrambleTask::new(&current, text, self.rng.as_mut());
        let handle = task.handle();
        self.task = Some(task);
        self.update();
        handle
    }

    /// Advance one animation frame. Returns true while a reveal is running.
    pub fn tick(&mut self) -> bool {
        self.update();
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.task.is_some()
    }

    /// Drop the in-flight task; its handle settles as cancelled.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.settle(ScrambleStatus::Cancelled);
        }
    }

    pub fn task(&self) -> Option<&ScrambleTask> {
        self.task.as_ref()
    }

    fn update(&mut self) {
        let Some(task) = self.task.as_mut() else {
            return;
        };

        let output = task.render(self.rng.as_mut());
        self.target.render(&output);

        if output.is_complete() {
            task.settle(ScrambleStatus::Resolved);
            self.task = None;
        } else {
            task.frame += 1;
        }
    }
}
