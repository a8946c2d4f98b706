use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;

use super::defaults::default_success_messages;
use super::normalize::{
    normalize_landing, normalize_landing_strict, normalize_riddles_lenient,
    normalize_riddles_strict,
};
use super::types::{GameContent, LandingContent, Riddle};
use crate::error::ContentError;

pub const CONTENT_FILE: &str = "game_content.json";
pub const LEGACY_RIDDLES_FILE: &str = "riddles.json";

/// An immutable published state: the document plus the views derived from it.
///
/// `success_texts[i]` and `success_sounds[i]` always describe the same message,
/// and neither list is ever empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentView {
    pub content: GameContent,
    pub success_texts: Vec<String>,
    pub success_sounds: Vec<String>,
}

impl ContentView {
    pub fn new(mut content: GameContent) -> Self {
        if content.landing.success_messages.is_empty() {
            content.landing.success_messages = default_success_messages();
        }
        let (success_texts, success_sounds) = content
            .landing
            .success_messages
            .iter()
            .map(|m| (m.text.clone(), m.sound.clone()))
            .unzip();
        Self {
            content,
            success_texts,
            success_sounds,
        }
    }

    pub fn riddles(&self) -> &[Riddle] {
        &self.content.riddles
    }

    pub fn riddle(&self, id: usize) -> Option<&Riddle> {
        self.content.riddles.get(id)
    }

    pub fn landing(&self) -> &LandingContent {
        &self.content.landing
    }

    pub fn treasure_message(&self) -> &str {
        &self.content.landing.treasure_message
    }
}

/// Owns the canonical game content for the lifetime of the process.
///
/// Readers take an `Arc` snapshot and never see a half-applied save. Saves are
/// serialized by `save_lock` and publish only after the file write succeeded.
pub struct ContentStore {
    data_dir: PathBuf,
    current: RwLock<Arc<ContentView>>,
    save_lock: Mutex<()>,
}

impl ContentStore {
    /// Loads whatever is persisted under `data_dir`, falling back to defaults.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let content = load(&data_dir);
        tracing::info!(
            "Loaded {} riddles from {}",
            content.riddles.len(),
            data_dir.display()
        );
        Self::with_content(data_dir, content)
    }

    /// A store that starts from `content` without reading the disk.
    pub fn with_content(data_dir: impl Into<PathBuf>, content: GameContent) -> Self {
        Self {
            data_dir: data_dir.into(),
            current: RwLock::new(Arc::new(ContentView::new(content))),
            save_lock: Mutex::new(()),
        }
    }

    pub fn content_path(&self) -> PathBuf {
        self.data_dir.join(CONTENT_FILE)
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.data_dir.join(LEGACY_RIDDLES_FILE)
    }

    pub fn snapshot(&self) -> Arc<ContentView> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Strictly normalizes, persists and then publishes a whole new document.
    ///
    /// On any error the previously published content stays in place.
    pub fn save(&self, riddles: &Value, landing: &Value) -> Result<Arc<ContentView>, ContentError> {
        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let content = GameContent {
            riddles: normalize_riddles_strict(riddles)?,
            landing: normalize_landing_strict(landing)?,
        };

        write_json_atomic(&self.content_path(), &content)?;
        if let Err(e) = write_json_atomic(&self.legacy_path(), &content.riddles) {
            tracing::warn!("Legacy riddle file not updated: {}", e);
        }

        let view = Arc::new(ContentView::new(content));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&view);

        tracing::info!(
            "Saved {} riddles and {} success messages to {}",
            view.riddles().len(),
            view.success_texts.len(),
            self.content_path().display()
        );
        Ok(view)
    }
}

/// Combined document, then the legacy riddle file, then built-in defaults.
pub fn load(data_dir: &Path) -> GameContent {
    let combined = data_dir.join(CONTENT_FILE);
    match read_json(&combined) {
        Ok(Value::Object(doc)) => {
            let riddles = doc.get("riddles").unwrap_or(&Value::Null);
            let landing = doc.get("landing").unwrap_or(&Value::Null);
            return GameContent {
                riddles: normalize_riddles_lenient(riddles),
                landing: normalize_landing(landing),
            };
        }
        Ok(_) => tracing::warn!("{} is not a JSON object, ignoring it", combined.display()),
        Err(e) if e.is_not_found() => {}
        Err(e) => tracing::warn!("Could not read {}: {}", combined.display(), e),
    }

    let legacy = data_dir.join(LEGACY_RIDDLES_FILE);
    let riddles = match read_json(&legacy) {
        Ok(raw) => normalize_riddles_lenient(&raw),
        Err(e) => {
            if !e.is_not_found() {
                tracing::warn!("Could not read {}: {}", legacy.display(), e);
            }
            Vec::new()
        }
    };

    GameContent {
        riddles,
        landing: LandingContent::default(),
    }
}

#[derive(Debug, thiserror::Error)]
enum ReadError {
    #[error("{0}")]
    Io(std::io::Error),
    #[error("invalid JSON: {0}")]
    Parse(serde_json::Error),
}

impl ReadError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

fn read_json(path: &Path) -> Result<Value, ReadError> {
    let content = fs::read_to_string(path).map_err(ReadError::Io)?;
    serde_json::from_str(&content).map_err(ReadError::Parse)
}

/// Writes to a temp file next to `path`, then renames it over the target.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ContentError> {
    let write_err = |source| ContentError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&bytes).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::defaults::{default_success_messages, DEFAULT_TOLERANCE_M};
    use serde_json::json;
    use tempfile::TempDir;

    fn two_riddles() -> Value {
        json!([
            {"text": "First", "lat": 32.0, "lng": 34.0, "tolerance_m": 100},
            {"text": "Second", "lat": 32.1, "lng": 34.1, "tolerance_m": 50}
        ])
    }

    #[test]
    fn empty_dir_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::open(dir.path());
        let view = store.snapshot();
        assert!(view.riddles().is_empty());
        assert_eq!(view.landing(), &LandingContent::default());
    }

    #[test]
    fn save_then_reopen_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::open(dir.path());
        store
            .save(&two_riddles(), &json!({"headline": "Hunt", "treasure_message": "Dig here"}))
            .unwrap();

        let reopened = ContentStore::open(dir.path()).snapshot();
        assert_eq!(reopened.content, store.snapshot().content);
        assert_eq!(reopened.riddles()[1].id, 1);
        assert_eq!(reopened.treasure_message(), "Dig here");
        assert!(dir.path().join(LEGACY_RIDDLES_FILE).exists());
    }

    #[test]
    fn empty_success_messages_read_back_as_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::open(dir.path());
        store
            .save(&two_riddles(), &json!({"success_messages": []}))
            .unwrap();

        let view = ContentStore::open(dir.path()).snapshot();
        assert_eq!(view.landing().success_messages, default_success_messages());
        assert_eq!(view.success_texts.len(), view.success_sounds.len());
        assert!(!view.success_texts.is_empty());
    }

    #[test]
    fn rejected_save_leaves_disk_and_memory_untouched() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::open(dir.path());
        store.save(&two_riddles(), &json!({})).unwrap();
        let before_disk = fs::read_to_string(store.content_path()).unwrap();
        let before_view = store.snapshot();

        let err = store
            .save(&json!([{"text": "x", "lat": "not-a-number", "lng": 1}]), &json!({}))
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(fs::read_to_string(store.content_path()).unwrap(), before_disk);
        assert_eq!(store.snapshot(), before_view);
    }

    #[test]
    fn failed_write_does_not_publish() {
        let dir = TempDir::new().unwrap();
        // A regular file where the data directory should be makes every write fail.
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        let store = ContentStore::with_content(&blocker, GameContent::default());

        let err = store.save(&two_riddles(), &json!({})).unwrap_err();
        assert!(matches!(err, ContentError::Write { .. }));
        assert!(store.snapshot().riddles().is_empty());
    }

    #[test]
    fn corrupt_combined_falls_back_to_legacy() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONTENT_FILE), "{ not json").unwrap();
        fs::write(
            dir.path().join(LEGACY_RIDDLES_FILE),
            r#"[{"id": 9, "text": "Old", "lat": "31.5", "lng": 35}, "junk", {"lat": "oops"}]"#,
        )
        .unwrap();

        let content = load(dir.path());
        assert_eq!(content.riddles.len(), 2);
        assert_eq!(content.riddles[0].id, 0);
        assert_eq!(content.riddles[0].lat, 31.5);
        assert_eq!(content.riddles[1].lat, 0.0);
        assert_eq!(content.riddles[1].tolerance_m, DEFAULT_TOLERANCE_M);
        assert_eq!(content.landing, LandingContent::default());
    }

    #[test]
    fn corrupt_everything_yields_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONTENT_FILE), "[1, 2, 3]").unwrap();
        fs::write(dir.path().join(LEGACY_RIDDLES_FILE), "nope").unwrap();
        assert_eq!(load(dir.path()), GameContent::default());
    }

    #[test]
    fn combined_document_is_leniently_loaded() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONTENT_FILE),
            r#"{"riddles": [{"text": "T", "lat": "bad", "lng": 2}], "landing": "oops"}"#,
        )
        .unwrap();
        let content = load(dir.path());
        assert_eq!(content.riddles[0].lat, 0.0);
        assert_eq!(content.landing, LandingContent::default());
    }

    #[test]
    fn concurrent_saves_never_mix_documents() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ContentStore::open(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let riddles = json!([{"text": format!("r{i}"), "lat": i, "lng": i}]);
                    let landing = json!({"headline": format!("h{i}")});
                    store.save(&riddles, &landing).unwrap();
                    let view = store.snapshot();
                    let tag = view.riddles()[0].text.trim_start_matches('r').to_string();
                    assert_eq!(view.landing().headline, format!("h{tag}"));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let view = ContentStore::open(dir.path()).snapshot();
        let tag = view.riddles()[0].text.trim_start_matches('r');
        assert_eq!(view.landing().headline, format!("h{tag}"));
    }
}
