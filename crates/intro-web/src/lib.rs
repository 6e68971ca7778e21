//! Browser bindings for the intro.
//!
//! The page calls `intro_init` once on load, then `intro_tick` from every
//! `requestAnimationFrame` until `intro_is_complete` reports true. The
//! `epicLoadingComplete` window event fires exactly once along the way.

mod audio;
mod dom;
mod random;
pub mod runner;
mod storage;

pub use runner::IntroRunner;

use std::cell::RefCell;

use intro_engine::{
    InputEvent, IntroConfig, RevealCopy, StageSequencer, Theme, ThemePreference, UnknownTheme,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{KeyboardEvent, Window};

use crate::dom::{build_stage_kit, DomSurface, WindowCompletion};
use crate::storage::{apply_theme, LocalThemeStore};

thread_local! {
    static RUNNER: RefCell<Option<IntroRunner>> = RefCell::new(None);
    static THEME: RefCell<Option<ThemePreference<LocalThemeStore>>> = RefCell::new(None);
}

/// Run `f` against the runner. `None` before init, or when re-entered from a
/// listener the runner itself triggered.
fn with_runner<R>(f: impl FnOnce(&mut IntroRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.try_borrow_mut().ok()?;
        borrow.as_mut().map(f)
    })
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub fn intro_init(config_json: Option<String>) {
    init_logging();

    if RUNNER.with(|cell| cell.borrow().is_some()) {
        log::warn!("intro_init called twice; ignoring");
        return;
    }
    let Some(window) = web_sys::window() else {
        log::error!("no window; intro cannot run");
        return;
    };
    let Some(document) = window.document() else {
        log::error!("no document; intro cannot run");
        return;
    };

    // A bad config still needs copy for the fallback path, so parse errors
    // become the setup outcome instead of aborting init.
    let (config, config_error) = match config_json.as_deref().map(IntroConfig::from_json) {
        None => (IntroConfig::default(), None),
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (IntroConfig::default(), Some(err)),
    };

    let sequencer = StageSequencer::new(
        Box::new(DomSurface::new(&document)),
        Box::new(WindowCompletion::new(window.clone())),
        RevealCopy {
            name: config.name_text.clone(),
            role: config.role_text.clone(),
        },
    );
    let setup = match config_error {
        Some(err) => Err(err),
        None => build_stage_kit(&window, &document, &config),
    };

    let host = window.location().hostname().unwrap_or_default();
    let mut runner = IntroRunner::new(sequencer, config.skip.clone(), &host);
    let skip_enabled = runner.skip_enabled();
    runner.start(setup);
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));

    if skip_enabled {
        if let Err(err) = bind_skip_keys(&window) {
            log::warn!("could not bind skip keys: {:?}", err);
        }
    }
    log::info!("intro: initialized");
}

fn bind_skip_keys(window: &Window) -> Result<(), JsValue> {
    let on_key = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        with_runner(|r| r.push_input(InputEvent::KeyDown { key: event.key() }));
    }) as Box<dyn FnMut(KeyboardEvent)>);
    window.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();
    Ok(())
}

#[wasm_bindgen]
pub fn intro_tick(dt_ms: f64) {
    with_runner(|r| r.tick(dt_ms));
}

/// Forward a key press; only skip keys on a dev host have any effect.
#[wasm_bindgen]
pub fn intro_key_down(key: String) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key }));
}

#[wasm_bindgen]
pub fn intro_skip() {
    with_runner(|r| r.push_input(InputEvent::Skip));
}

#[wasm_bindgen]
pub fn intro_current_stage() -> u8 {
    with_runner(|r| r.session().current_stage()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn intro_is_complete() -> bool {
    with_runner(|r| r.session().is_complete()).unwrap_or(false)
}

/// Apply the stored theme and return its name.
#[wasm_bindgen]
pub fn theme_init() -> String {
    init_logging();
    let preference = ThemePreference::load(LocalThemeStore::new());
    let theme = preference.current();
    if let Err(err) = apply_theme(theme) {
        log::warn!("could not apply theme {}: {:?}", theme, err);
    }
    THEME.with(|cell| *cell.borrow_mut() = Some(preference));
    theme.name().to_string()
}

#[wasm_bindgen]
pub fn theme_select(name: &str) -> Result<(), JsValue> {
    let theme: Theme = name
        .parse()
        .map_err(|err: UnknownTheme| JsValue::from_str(&err.to_string()))?;
    THEME.with(|cell| {
        cell.borrow_mut()
            .get_or_insert_with(|| ThemePreference::load(LocalThemeStore::new()))
            .select(theme)
    });
    apply_theme(theme)
}
