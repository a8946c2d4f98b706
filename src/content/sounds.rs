use anyhow::Result;
use std::path::Path;

use super::types::LandingContent;

pub const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "m4a", "wav", "ogg"];

/// File names of the audio clips available under `dir`, sorted.
pub fn list_sounds(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut sounds: Vec<String> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
        })
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();

    sounds.sort();
    Ok(sounds)
}

/// Success-message sounds that are not in the library, without duplicates.
pub fn missing_sounds(landing: &LandingContent, available: &[String]) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for message in &landing.success_messages {
        if !available.contains(&message.sound) && !missing.contains(&message.sound) {
            missing.push(message.sound.clone());
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SuccessMessage;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_only_audio_files() {
        let dir = TempDir::new().unwrap();
        for name in ["b.m4a", "a.MP3", "notes.txt", "c.ogg"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("folder.wav")).unwrap();

        let sounds = list_sounds(dir.path()).unwrap();
        assert_eq!(sounds, vec!["a.MP3", "b.m4a", "c.ogg"]);
    }

    #[test]
    fn directory_names_with_glob_characters_are_literal() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("clips [v2]*?");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("cheer.m4a"), b"").unwrap();
        fs::write(root.path().join("stray.mp3"), b"").unwrap();

        assert_eq!(list_sounds(&dir).unwrap(), vec!["cheer.m4a"]);
    }

    #[test]
    fn missing_directory_is_an_empty_library() {
        let dir = TempDir::new().unwrap();
        assert!(list_sounds(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn reports_each_missing_sound_once() {
        let mut landing = LandingContent::default();
        landing.success_messages = vec![
            SuccessMessage { text: "a".into(), sound: "here.m4a".into() },
            SuccessMessage { text: "b".into(), sound: "gone.m4a".into() },
            SuccessMessage { text: "c".into(), sound: "gone.m4a".into() },
        ];
        let missing = missing_sounds(&landing, &["here.m4a".to_string()]);
        assert_eq!(missing, vec!["gone.m4a"]);
    }
}
