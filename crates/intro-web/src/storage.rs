use intro_engine::{Theme, ThemeStore};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Storage};

/// `window.localStorage`, if the browser allows it.
pub struct LocalThemeStore {
    storage: Option<Storage>,
}

impl LocalThemeStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::info!("localStorage unavailable; theme choice will not persist");
        }
        Self { storage }
    }
}

impl Default for LocalThemeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeStore for LocalThemeStore {
    fn load(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.set_item(key, value) {
                log::warn!("could not persist {}={}: {:?}", key, value, err);
            }
        }
    }
}

/// Set `data-theme` on the root element and mark the matching picker option.
pub fn apply_theme(theme: Theme) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let root = document.document_element().ok_or("no root element")?;
    root.set_attribute("data-theme", theme.name())?;

    let options = document.query_selector_all(".theme-option")?;
    for i in 0..options.length() {
        let Some(option) = options.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let selected = option.get_attribute("data-theme").as_deref() == Some(theme.name());
        option.class_list().toggle_with_force("active", selected)?;
    }
    Ok(())
}
