use serde::{Deserialize, Serialize};

use crate::api::error::SetupError;

/// Configuration for the intro, provided by the page at init.
/// Timing is fixed; only copy, randomness and the dev skip binding vary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Text revealed in the name field during stage 2.
    pub name_text: String,
    /// Text revealed in the role field during stage 2.
    pub role_text: String,
    /// Seed for reproducible scrambles. `None` uses the host's random source.
    pub seed: Option<u64>,
    /// Developer skip binding.
    pub skip: SkipBinding,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            name_text: "KYLE EURIE".to_string(),
            role_text: "DEVELOPER".to_string(),
            seed: None,
            skip: SkipBinding::default(),
        }
    }
}

impl IntroConfig {
    /// Parse from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Keys that skip the intro, and the hosts where that is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipBinding {
    /// `KeyboardEvent.key` values.
    pub keys: Vec<String>,
    /// Hostnames treated as development.
    pub dev_hosts: Vec<String>,
}

impl Default for SkipBinding {
    fn default() -> Self {
        Self {
            keys: vec![" ".to_string(), "Enter".to_string()],
            dev_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
        }
    }
}

impl SkipBinding {
    pub fn is_active_on(&self, host: &str) -> bool {
        self.dev_hosts.iter().any(|h| h == host)
    }

    pub fn matches_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}
