// Pitch domain: pure frequency/MIDI/name math and the estimator boundary

pub mod estimator;
pub mod math;

pub use estimator::{ANALYSIS_WINDOW_SIZE, PitchEstimator};
pub use math::{
    A4_FREQUENCY_HZ, MIDI_MAX, MIDI_MIN, NOTE_NAMES, frequency_to_midi, frequency_to_note_name,
    midi_to_frequency, midi_to_note_name, note_name_to_midi, semitone_distance,
};
