// Melody library - local persistence for melodies and synth presets
// Melodies are pretty JSON documents, presets RON files

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::melody::types::{Melody, SynthPreset};
use crate::melody::validate_melody;

/// Persistence error types
#[derive(Debug, thiserror::Error)]
pub enum MelodyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("invalid melody: {0}")]
    Validation(String),

    #[error("no saved melody or preset named {0:?}")]
    NotFound(String),

    #[error("file system error: {0}")]
    FileSystem(String),
}

/// Local melody/preset storage rooted at one base directory
#[derive(Debug, Clone)]
pub struct MelodyLibrary {
    melodies_dir: PathBuf,
    presets_dir: PathBuf,
}

impl MelodyLibrary {
    /// Library rooted at an explicit directory
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        Self {
            melodies_dir: base_dir.join("melodies"),
            presets_dir: base_dir.join("presets"),
        }
    }

    /// Library at the user's default location (`~/.voxroll`)
    pub fn at_default_location() -> Result<Self, MelodyError> {
        let home = dirs::home_dir()
            .ok_or_else(|| MelodyError::FileSystem("cannot locate home directory".to_string()))?;
        Ok(Self::new(home.join(".voxroll")))
    }

    pub fn melodies_dir(&self) -> &Path {
        &self.melodies_dir
    }

    pub fn presets_dir(&self) -> &Path {
        &self.presets_dir
    }

    /// Save a melody, assigning its id and creation timestamp.
    ///
    /// Returns the stored copy; its `id` names the file on disk.
    pub fn save_melody(&self, melody: &Melody) -> Result<Melody, MelodyError> {
        validate_melody(melody)?;

        let mut stored = melody.clone();
        let id = stored
            .id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone();
        if stored.created_at.is_empty() {
            stored.created_at = chrono::Utc::now().to_rfc3339();
        }

        fs::create_dir_all(&self.melodies_dir)?;
        let path = self.melody_path(&id);
        fs::write(&path, serde_json::to_string_pretty(&stored)?)?;
        info!("saved melody {:?} ({} notes) to {}", stored.name, stored.notes.len(), path.display());
        Ok(stored)
    }

    /// Load one melody by id
    pub fn load_melody(&self, id: &str) -> Result<Melody, MelodyError> {
        let path = self.melody_path(id);
        if !path.is_file() {
            return Err(MelodyError::NotFound(id.to_string()));
        }
        let melody: Melody = serde_json::from_str(&fs::read_to_string(path)?)?;
        validate_melody(&melody)?;
        Ok(melody)
    }

    /// All saved melodies, oldest first.
    ///
    /// Unreadable or malformed files are skipped with a warning so one bad
    /// document cannot hide the rest of the library.
    pub fn list_melodies(&self) -> Result<Vec<Melody>, MelodyError> {
        let mut melodies = Vec::new();
        let entries = match fs::read_dir(&self.melodies_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(melodies),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(MelodyError::from)
                .and_then(|text| Ok(serde_json::from_str::<Melody>(&text)?))
            {
                Ok(melody) => melodies.push(melody),
                Err(e) => warn!("skipping unreadable melody {}: {e}", path.display()),
            }
        }

        melodies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(melodies)
    }

    /// Delete one melody by id
    pub fn delete_melody(&self, id: &str) -> Result<(), MelodyError> {
        let path = self.melody_path(id);
        if !path.is_file() {
            return Err(MelodyError::NotFound(id.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Save a synth preset under its name
    pub fn save_preset(&self, preset: &SynthPreset) -> Result<(), MelodyError> {
        if preset.name.trim().is_empty() {
            return Err(MelodyError::Validation("preset name cannot be empty".to_string()));
        }
        fs::create_dir_all(&self.presets_dir)?;
        let text = ron::ser::to_string_pretty(preset, ron::ser::PrettyConfig::default())?;
        fs::write(self.preset_path(&preset.name), text)?;
        info!("saved preset {:?}", preset.name);
        Ok(())
    }

    /// Load a synth preset by name
    pub fn load_preset(&self, name: &str) -> Result<SynthPreset, MelodyError> {
        let path = self.preset_path(name);
        if !path.is_file() {
            return Err(MelodyError::NotFound(name.to_string()));
        }
        let preset =
            ron::de::from_str(&fs::read_to_string(path)?).map_err(ron::Error::from)?;
        Ok(preset)
    }

    /// Names of all saved presets
    pub fn list_presets(&self) -> Result<Vec<String>, MelodyError> {
        let mut names = Vec::new();
        let entries = match fs::read_dir(&self.presets_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.replace('_', " "));
            }
        }

        names.sort();
        Ok(names)
    }

    fn melody_path(&self, id: &str) -> PathBuf {
        self.melodies_dir.join(format!("{id}.json"))
    }

    fn preset_path(&self, name: &str) -> PathBuf {
        self.presets_dir.join(format!("{}.ron", name.replace(' ', "_")))
    }
}
