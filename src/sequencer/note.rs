// Note representation for the melody sequencer
// A note pairs a pitch (name + equal-tempered frequency) with a time span

use crate::pitch::math::{midi_to_frequency, midi_to_note_name, note_name_to_midi};

/// A recorded or drawn musical note.
///
/// `frequency_hz` is always the equal-tempered frequency of `pitch_name`
/// (A4 = 440 Hz); the two are only ever updated together. Times are seconds
/// relative to the start of the take.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Pitch name with octave, e.g. "C#4"
    pub pitch_name: String,

    /// Equal-tempered frequency derived from the pitch name
    pub frequency_hz: f64,

    /// Onset, seconds from the start of the take
    pub start_time_sec: f64,

    /// Length in seconds; 0 only while the note is still provisional
    pub duration_sec: f64,
}

impl Note {
    /// Creates a note from a pitch name, deriving the frequency.
    ///
    /// Panics on a malformed pitch name or negative times; callers construct
    /// notes from already-validated pitch material.
    pub fn new(pitch_name: impl Into<String>, start_time_sec: f64, duration_sec: f64) -> Self {
        let pitch_name = pitch_name.into();
        let midi = note_name_to_midi(&pitch_name)
            .unwrap_or_else(|| panic!("invalid pitch name: {pitch_name:?}"));
        assert!(start_time_sec >= 0.0, "note start must be >= 0");
        assert!(duration_sec >= 0.0, "note duration must be >= 0");

        Self {
            pitch_name,
            frequency_hz: midi_to_frequency(midi),
            start_time_sec,
            duration_sec,
        }
    }

    /// Creates a note directly from a MIDI number
    pub fn from_midi(midi: i32, start_time_sec: f64, duration_sec: f64) -> Self {
        Self::new(midi_to_note_name(midi), start_time_sec, duration_sec)
    }

    /// MIDI number of this note's pitch
    pub fn midi(&self) -> i32 {
        // The constructor guarantees the name parses
        note_name_to_midi(&self.pitch_name).expect("note carries a valid pitch name")
    }

    /// End of the note, seconds from the start of the take
    pub fn end_time_sec(&self) -> f64 {
        self.start_time_sec + self.duration_sec
    }

    /// Retune to a new MIDI number, keeping name and frequency in sync
    pub fn set_midi(&mut self, midi: i32) {
        self.pitch_name = midi_to_note_name(midi);
        self.frequency_hz = midi_to_frequency(midi);
    }

    /// Half-open time-interval overlap against another span
    pub fn overlaps_span(&self, start_sec: f64, end_sec: f64) -> bool {
        start_sec < self.end_time_sec() && end_sec > self.start_time_sec
    }
}
