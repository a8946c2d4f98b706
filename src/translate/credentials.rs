use std::path::Path;

use serde_json::Value;

/// API keys read from the local key file. Empty means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub maps_key: String,
    pub translation_key: String,
}

impl Credentials {
    /// A missing or unreadable file simply yields empty keys.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(e) => {
                tracing::info!("No credentials at {} ({}), translation disabled", path.display(), e);
                Self::default()
            }
        }
    }

    /// Accepts a JSON object or `KEY=VALUE` lines.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }

        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
            let first = |keys: &[&str]| {
                keys.iter()
                    .filter_map(|k| match map.get(*k) {
                        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                        Some(Value::Number(n)) => Some(n.to_string()),
                        _ => None,
                    })
                    .next()
                    .unwrap_or_default()
            };
            return Self {
                maps_key: first(&["maps", "maps_key", "MAPS_KEY"]),
                translation_key: first(&["translation", "translation_key", "TRANSLATION_KEY"]),
            };
        }

        let mut credentials = Self::default();
        for line in raw.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim().to_lowercase().as_str() {
                "maps" | "maps_key" => credentials.maps_key = value,
                "translation" | "translation_key" => credentials.translation_key = value,
                _ => {}
            }
        }
        credentials
    }

    pub fn has_translation_key(&self) -> bool {
        !self.translation_key.is_empty()
    }
}
