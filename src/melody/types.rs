// Serializable types for melody and preset persistence
// These are the file/wire contract; the sequencer's own types stay private
// to the process

use serde::{Deserialize, Serialize};

use crate::sequencer::note::Note;

/// One note as it appears in a saved melody.
///
/// Field names match the exported JSON documents (`startTime`, `duration`),
/// so melodies saved by older builds keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MelodyNote {
    /// Pitch name, e.g. "C#4"
    pub note: String,
    /// Equal-tempered frequency in Hz
    pub frequency: f64,
    /// Onset in seconds from take start
    pub start_time: f64,
    /// Length in seconds
    pub duration: f64,
}

impl From<&Note> for MelodyNote {
    fn from(note: &Note) -> Self {
        Self {
            note: note.pitch_name.clone(),
            frequency: note.frequency_hz,
            start_time: note.start_time_sec,
            duration: note.duration_sec,
        }
    }
}

/// A saved melody: the whole take plus the tempo it was recorded at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Melody {
    /// Storage id, assigned on save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// User-facing name
    pub name: String,
    /// Tempo the note times are relative to
    pub bpm: u32,
    /// The take, in recording order
    pub notes: Vec<MelodyNote>,
    /// RFC 3339 creation timestamp, assigned on save
    #[serde(default)]
    pub created_at: String,
}

impl Melody {
    /// Snapshot a take for saving
    pub fn from_take(name: impl Into<String>, bpm: u32, notes: &[Note]) -> Self {
        Self {
            id: None,
            name: name.into(),
            bpm,
            notes: notes.iter().map(MelodyNote::from).collect(),
            created_at: String::new(),
        }
    }

    /// Rebuild sequencer notes from the file shape.
    ///
    /// Panics on malformed pitch material; run [`validate_melody`] first
    /// when the melody came from disk.
    ///
    /// [`validate_melody`]: crate::melody::validate_melody
    pub fn to_notes(&self) -> Vec<Note> {
        self.notes
            .iter()
            .map(|n| Note::new(n.note.clone(), n.start_time, n.duration))
            .collect()
    }
}

/// Oscillator waveshape, as the synth boundary names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator's contribution to the patch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorSetting {
    pub waveform: Waveform,
    /// Linear gain, 0.0 - 1.0
    pub volume: f32,
}

impl Default for OscillatorSetting {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            volume: 0.5,
        }
    }
}

/// Amplitude envelope, seconds except the 0-1 sustain level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdsrSetting {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for AdsrSetting {
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 0.2,
            sustain: 0.5,
            release: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LfoSetting {
    pub waveform: Waveform,
    pub frequency: f32,
}

impl Default for LfoSetting {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSetting {
    /// Cutoff in Hz
    pub frequency: f32,
    /// Resonance Q
    pub resonance: f32,
}

impl Default for FilterSetting {
    fn default() -> Self {
        Self {
            frequency: 500.0,
            resonance: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChorusSetting {
    pub frequency: f32,
    pub depth: f32,
    /// Stereo spread in degrees
    pub spread: f32,
}

impl Default for ChorusSetting {
    fn default() -> Self {
        Self {
            frequency: 1.5,
            depth: 0.0,
            spread: 180.0,
        }
    }
}

/// A complete synth patch, as plain data.
///
/// The core performs no synthesis; this is only the persistence contract
/// with the playback layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthPreset {
    pub name: String,
    pub oscillators: [OscillatorSetting; 3],
    pub adsr: AdsrSetting,
    pub lfo: LfoSetting,
    pub filter: FilterSetting,
    pub chorus: ChorusSetting,
    pub distortion: f32,
}

impl Default for SynthPreset {
    fn default() -> Self {
        Self {
            name: "Init".to_string(),
            oscillators: [OscillatorSetting::default(); 3],
            adsr: AdsrSetting::default(),
            lfo: LfoSetting::default(),
            filter: FilterSetting::default(),
            chorus: ChorusSetting::default(),
            distortion: 0.4,
        }
    }
}
