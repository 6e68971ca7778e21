//! DOM-backed implementations of the intro's collaborators.

use intro_engine::{
    CompletionPath, CompletionSink, IntroConfig, LoadingSurface, ScrambleFrame, SetupError,
    SoundCues, Stage, StageEffect, StageEffects, StageKit, TextScrambler, TextTarget,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, HtmlElement, Window};

use crate::audio::WebAudioCues;
use crate::random::random_source;

pub const STAGED_SCREEN_ID: &str = "epicLoadingScreen";
pub const FALLBACK_SCREEN_ID: &str = "loadingScreen";
const PROGRESS_FILL_ID: &str = "epicProgressFill";
const PROGRESS_TEXT_ID: &str = "progressText";
const NAME_ID: &str = "nameScramble";
const ROLE_ID: &str = "roleScramble";
const GEOMETRY_CANVAS_ID: &str = "geometry-canvas";

/// Particle canvases the stage effects draw into.
const PARTICLE_CANVAS_IDS: [&str; 3] = [
    "logo-particles-canvas",
    "name-particles-canvas",
    "entrance-particles",
];

/// Window event fired once when loading ends.
pub const COMPLETE_EVENT: &str = "epicLoadingComplete";

fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

fn require(document: &Document, id: &str) -> Result<Element, SetupError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SetupError::MissingElement(id.to_string()))
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        log::debug!("style {}={} rejected: {:?}", property, value, err);
    }
}

fn dispatch(window: &Window, name: &str, detail: &str) -> Result<(), JsValue> {
    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(detail));
    let event = CustomEvent::new_with_event_init_dict(name, &init)?;
    window.dispatch_event(&event)?;
    Ok(())
}

/// Progress bar, stage panels and the two loading screens.
/// Every element is optional; missing ones turn their calls into no-ops.
pub struct DomSurface {
    document: Document,
    staged: Option<HtmlElement>,
    fallback: Option<HtmlElement>,
    progress_fill: Option<HtmlElement>,
    progress_text: Option<Element>,
}

impl DomSurface {
    /// Look up the loading chrome and lock page scrolling until loading ends.
    pub fn new(document: &Document) -> Self {
        let surface = Self {
            document: document.clone(),
            staged: html_by_id(document, STAGED_SCREEN_ID),
            fallback: html_by_id(document, FALLBACK_SCREEN_ID),
            progress_fill: html_by_id(document, PROGRESS_FILL_ID),
            progress_text: document.get_element_by_id(PROGRESS_TEXT_ID),
        };
        surface.set_scroll_locked(true);
        surface
    }

    fn set_scroll_locked(&self, locked: bool) {
        if let Some(body) = self.document.body() {
            set_style(&body, "overflow", if locked { "hidden" } else { "auto" });
        }
    }

    fn stage_panel(&self, stage: Stage) -> Option<Element> {
        self.document
            .query_selector(&format!(".stage-{}", stage.number()))
            .ok()
            .flatten()
    }
}

impl LoadingSurface for DomSurface {
    fn set_progress(&mut self, percent: f64, status: &str) {
        if let Some(fill) = &self.progress_fill {
            set_style(fill, "width", &format!("{}%", percent));
        }
        if let Some(text) = &self.progress_text {
            text.set_text_content(Some(status));
        }
    }

    fn transition_stage(&mut self, from: Stage, to: Stage) {
        if let Some(panel) = self.stage_panel(from) {
            let classes = panel.class_list();
            let _ = classes.remove_1("active");
            let _ = classes.add_1("hidden-stage");
        }
        if let Some(panel) = self.stage_panel(to) {
            let _ = panel.class_list().add_1("active");
        }
    }

    fn play_exit(&mut self) {
        // The exit fade itself lives in CSS under `.hidden`.
        if let Some(screen) = &self.staged {
            let _ = screen.class_list().add_1("hidden");
            set_style(screen, "pointer-events", "none");
        }
        self.set_scroll_locked(false);
    }

    fn hide_staged_ui(&mut self) {
        if let Some(screen) = &self.staged {
            set_style(screen, "display", "none");
        }
    }

    fn show_fallback_indicator(&mut self) {
        if let Some(screen) = &self.fallback {
            set_style(screen, "display", "flex");
        }
    }

    fn finish_fallback(&mut self) {
        if let Some(screen) = &self.fallback {
            let _ = screen.class_list().add_1("hidden");
        }
        self.set_scroll_locked(false);
    }
}

/// Fires `epicLoadingComplete` on `window`, with the path as detail.
pub struct WindowCompletion {
    window: Window,
}

impl WindowCompletion {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl CompletionSink for WindowCompletion {
    fn loading_complete(&mut self, path: CompletionPath) {
        if let Err(err) = dispatch(&self.window, COMPLETE_EVENT, path.name()) {
            log::error!("could not dispatch {}: {:?}", COMPLETE_EVENT, err);
        }
    }
}

/// Hands stage effects to the page's animation code as `intro:<effect>`
/// window events.
pub struct DomEffects {
    window: Window,
    geometry_available: bool,
}

impl StageEffects for DomEffects {
    fn trigger(&mut self, effect: StageEffect) {
        if effect == StageEffect::GeometryReveal && !self.geometry_available {
            log::debug!("no 3D canvas; skipping {}", effect.name());
            return;
        }
        let name = format!("intro:{}", effect.name());
        if let Err(err) = dispatch(&self.window, &name, effect.name()) {
            log::debug!("effect {} dropped: {:?}", name, err);
        }
    }
}

/// A scramble text node. Reads back `textContent`, writes `innerHTML`.
pub struct DomText {
    element: Element,
}

impl TextTarget for DomText {
    fn text(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn render(&mut self, frame: &ScrambleFrame) {
        self.element.set_inner_html(&frame.to_html());
    }
}

/// Build everything the staged experience needs.
/// Missing required markup is a setup error; audio and the 3D canvas are optional.
pub fn build_stage_kit(
    window: &Window,
    document: &Document,
    config: &IntroConfig,
) -> Result<StageKit, SetupError> {
    for id in [STAGED_SCREEN_ID, PROGRESS_FILL_ID, PROGRESS_TEXT_ID] {
        require(document, id)?;
    }
    for id in PARTICLE_CANVAS_IDS {
        require(document, id)?;
    }
    let name = require(document, NAME_ID)?;
    let role = require(document, ROLE_ID)?;

    let sounds = WebAudioCues::new().map(|cues| Box::new(cues) as Box<dyn SoundCues>);

    let geometry_available = document.get_element_by_id(GEOMETRY_CANVAS_ID).is_some();
    if !geometry_available {
        log::info!("{} missing; 3D stage reveal disabled", GEOMETRY_CANVAS_ID);
    }

    Ok(StageKit {
        sounds,
        effects: Box::new(DomEffects {
            window: window.clone(),
            geometry_available,
        }),
        name: TextScrambler::new(
            Box::new(DomText { element: name }),
            random_source(config.seed, 1),
        ),
        role: TextScrambler::new(
            Box::new(DomText { element: role }),
            random_source(config.seed, 2),
        ),
    })
}
