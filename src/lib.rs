// voxroll - voice-to-piano-roll melody sketcher core
// Library exports for the demo binary, tests, and benchmarks

pub mod melody;
pub mod pitch;
pub mod roll;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use melody::{Melody, MelodyError, MelodyLibrary, MelodyNote, SynthPreset};
pub use pitch::{ANALYSIS_WINDOW_SIZE, PitchEstimator};
pub use roll::{EditGesture, HitRegion, RollEditor, RollGeometry};
pub use sequencer::{
    EditError, Frame, MelodyRecorder, Note, NoteSegmenter, NoteStore, RecordingSession,
    SegmenterConfig,
};
