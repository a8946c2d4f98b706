use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "riddle-hunt.toml";
pub const GOOGLE_TRANSLATE_ENDPOINT: &str =
    "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HuntConfig {
    pub data_dir: PathBuf,
    /// Relative paths below are resolved against `data_dir`.
    pub credentials_file: PathBuf,
    pub sounds_dir: PathBuf,
    pub log_dir: PathBuf,
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub source_lang: String,
    pub target_lang: String,
    pub batch_size: usize,
    pub timeout_secs: u64,
    /// Requests carrying more texts are truncated to this many.
    pub max_texts: usize,
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            credentials_file: PathBuf::from("google_keys.txt"),
            sounds_dir: PathBuf::from("static/assets/sounds"),
            log_dir: PathBuf::from("logs"),
            translation: TranslationConfig::default(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_TRANSLATE_ENDPOINT.to_string(),
            source_lang: "he".to_string(),
            target_lang: "en".to_string(),
            batch_size: 80,
            timeout_secs: 10,
            max_texts: 500,
        }
    }
}

impl HuntConfig {
    /// Reads `path` if it exists; a missing file means all defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: HuntConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join(&self.credentials_file)
    }

    pub fn sounds_path(&self) -> PathBuf {
        self.data_dir.join(&self.sounds_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_dir)
    }
}
