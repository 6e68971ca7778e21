//! Color theme preference, the one piece of durable state on the page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ports::ThemeStore;

/// Storage key holding the selected theme name.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Neon,
    Cyberpunk,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Dark, Theme::Light, Theme::Neon, Theme::Cyberpunk];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Neon => "neon",
            Theme::Cyberpunk => "cyberpunk",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme `{0}`")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// The selected theme, read once from the store and written back on selection.
pub struct ThemePreference<S: ThemeStore> {
    store: S,
    current: Theme,
}

impl<S: ThemeStore> ThemePreference<S> {
    pub fn load(store: S) -> Self {
        let current = match store.load(THEME_KEY) {
            Some(stored) => stored.parse().unwrap_or_else(|err: UnknownTheme| {
                log::warn!("{}; using {}", err, Theme::default());
                Theme::default()
            }),
            None => Theme::default(),
        };
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn select(&mut self, theme: Theme) {
        self.current = theme;
        self.store.save(THEME_KEY, theme.name());
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
