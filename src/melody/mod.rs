// Melody persistence: serializable shapes and the local library
// Remote backends speak the same shapes; only the transport differs

pub mod library;
pub mod types;

pub use library::{MelodyError, MelodyLibrary};
pub use types::{
    AdsrSetting, ChorusSetting, FilterSetting, LfoSetting, Melody, MelodyNote, OscillatorSetting,
    SynthPreset, Waveform,
};

use crate::pitch::math::{MIDI_MAX, MIDI_MIN, note_name_to_midi};
use crate::sequencer::session::RecordingSession;

/// Check a melody before it is written to or trusted from disk
pub fn validate_melody(melody: &Melody) -> Result<(), MelodyError> {
    if melody.name.trim().is_empty() {
        return Err(MelodyError::Validation("melody name cannot be empty".to_string()));
    }
    if melody.name.len() > 255 {
        return Err(MelodyError::Validation(
            "melody name cannot exceed 255 characters".to_string(),
        ));
    }
    if !RecordingSession::is_valid_bpm(melody.bpm) {
        return Err(MelodyError::Validation(format!(
            "BPM {} outside the supported 20-400 range",
            melody.bpm
        )));
    }
    if melody.notes.is_empty() {
        return Err(MelodyError::Validation("melody has no notes".to_string()));
    }

    for (i, note) in melody.notes.iter().enumerate() {
        let midi = note_name_to_midi(&note.note).ok_or_else(|| {
            MelodyError::Validation(format!("note {i} has malformed pitch name {:?}", note.note))
        })?;
        if !(MIDI_MIN..=MIDI_MAX).contains(&midi) {
            return Err(MelodyError::Validation(format!(
                "note {i} ({}) is outside the playable range C2..C8",
                note.note
            )));
        }
        if !note.start_time.is_finite() || note.start_time < 0.0 {
            return Err(MelodyError::Validation(format!("note {i} has invalid start time")));
        }
        if !note.duration.is_finite() || note.duration <= 0.0 {
            return Err(MelodyError::Validation(format!("note {i} has invalid duration")));
        }
    }

    Ok(())
}
