// Sequencer domain: notes, the segmentation state machine, the editable
// note store, and the recording controller that ties them together

pub mod note;
pub mod recorder;
pub mod segmenter;
pub mod session;
pub mod store;

pub use note::Note;
pub use recorder::MelodyRecorder;
pub use segmenter::{Frame, NoteSegmenter, SegmenterConfig};
pub use session::RecordingSession;
pub use store::{EditError, MIN_NOTE_DURATION_SEC, NoteStore, sixteenth_grid_sec, snap_to_grid};
