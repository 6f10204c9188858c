// Note segmenter - streaming onset/offset detection
// Consumes per-frame (time, peak amplitude, estimated frequency) samples and
// appends finalized notes to the store

use crate::pitch::math::{frequency_to_note_name, semitone_distance};
use crate::sequencer::note::Note;
use crate::sequencer::store::NoteStore;

/// One analysis frame from the capture/estimation pipeline.
///
/// `frequency_hz` is `None` for an unvoiced window; `peak_amplitude` is
/// `max(|sample|)` over the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub time_sec: f64,
    pub peak_amplitude: f32,
    pub frequency_hz: Option<f64>,
}

impl Frame {
    pub fn new(time_sec: f64, peak_amplitude: f32, frequency_hz: Option<f64>) -> Self {
        Self {
            time_sec,
            peak_amplitude,
            frequency_hz,
        }
    }
}

/// Tuning knobs for the segmentation state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmenterConfig {
    /// Frames quieter than this are silence frames
    pub silence_amplitude_threshold: f32,

    /// How long silence must persist before it closes the active note
    pub min_silence_gap_sec: f64,

    /// Grace period after an onset during which large pitch jumps are
    /// treated as detector noise
    pub stabilization_sec: f64,

    /// Largest semitone move still considered the same note drifting
    pub max_semitone_jump: i32,

    /// Estimates outside this band (Hz) are discarded as unvoiced
    pub valid_frequency_range: (f64, f64),
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            silence_amplitude_threshold: 0.2,
            min_silence_gap_sec: 0.0001,
            stabilization_sec: 0.1,
            max_semitone_jump: 4,
            valid_frequency_range: (40.0, 5000.0),
        }
    }
}

/// Segmentation state: either between notes or tracking a provisional one
#[derive(Debug, Clone, PartialEq)]
enum SegmenterState {
    Idle,
    Active(Note),
}

/// The onset/offset state machine.
///
/// Feed it monotonically-timestamped frames; finalized notes land in the
/// store in onset order. Malformed or out-of-range frames are skipped, never
/// errors - a noisy detector must not be able to wedge the recording loop.
#[derive(Debug)]
pub struct NoteSegmenter {
    config: SegmenterConfig,
    state: SegmenterState,
    silence_started_sec: Option<f64>,
}

impl NoteSegmenter {
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    pub fn with_config(config: SegmenterConfig) -> Self {
        assert!(config.silence_amplitude_threshold >= 0.0);
        assert!(config.min_silence_gap_sec >= 0.0);
        assert!(config.stabilization_sec >= 0.0);
        assert!(config.max_semitone_jump >= 0);
        assert!(config.valid_frequency_range.0 < config.valid_frequency_range.1);

        Self {
            config,
            state: SegmenterState::Idle,
            silence_started_sec: None,
        }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// The provisional note currently being tracked, if any
    pub fn active_note(&self) -> Option<&Note> {
        match &self.state {
            SegmenterState::Idle => None,
            SegmenterState::Active(note) => Some(note),
        }
    }

    /// Process one analysis frame, appending any note it closes to `store`
    pub fn process_frame(&mut self, frame: Frame, store: &mut NoteStore) {
        // Silence gating takes priority; frequency rules are not evaluated
        // on quiet frames.
        if frame.peak_amplitude < self.config.silence_amplitude_threshold {
            let silence_start = *self.silence_started_sec.get_or_insert(frame.time_sec);
            if frame.time_sec - silence_start >= self.config.min_silence_gap_sec {
                self.close_active_at(frame.time_sec, store);
            }
            return;
        }
        self.silence_started_sec = None;

        let Some(frequency_hz) = frame.frequency_hz else {
            return;
        };
        let (min_hz, max_hz) = self.config.valid_frequency_range;
        if frequency_hz < min_hz || frequency_hz > max_hz {
            return;
        }
        let Some(candidate) = frequency_to_note_name(frequency_hz) else {
            return;
        };

        match &mut self.state {
            SegmenterState::Idle => {
                self.state = SegmenterState::Active(Note::new(candidate, frame.time_sec, 0.0));
            }
            SegmenterState::Active(active) => {
                let elapsed = frame.time_sec - active.start_time_sec;
                let distance = semitone_distance(&candidate, &active.pitch_name);

                if elapsed < self.config.stabilization_sec
                    && distance > self.config.max_semitone_jump
                {
                    // Octave-error blip right after the onset
                    return;
                }

                if distance <= self.config.max_semitone_jump {
                    // Same note drifting; the first stable pitch label wins
                    active.duration_sec = elapsed;
                } else {
                    active.duration_sec = elapsed;
                    let closed = std::mem::replace(
                        active,
                        Note::new(candidate, frame.time_sec, 0.0),
                    );
                    store.append(closed);
                }
            }
        }
    }

    /// Finalize whatever is active when recording stops.
    ///
    /// The note keeps the duration of its last voiced frame and is appended,
    /// never dropped; a note that never got past duration zero is rescued by
    /// the post-stop quantize pass, which floors durations at one grid step.
    pub fn flush(&mut self, store: &mut NoteStore) {
        if let SegmenterState::Active(note) =
            std::mem::replace(&mut self.state, SegmenterState::Idle)
        {
            store.append(note);
        }
        self.silence_started_sec = None;
    }

    /// Back to `Idle`, discarding any provisional note
    pub fn reset(&mut self) {
        self.state = SegmenterState::Idle;
        self.silence_started_sec = None;
    }

    fn close_active_at(&mut self, time_sec: f64, store: &mut NoteStore) {
        if let SegmenterState::Active(mut note) =
            std::mem::replace(&mut self.state, SegmenterState::Idle)
        {
            note.duration_sec = time_sec - note.start_time_sec;
            store.append(note);
        }
    }
}

impl Default for NoteSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_STEP: f64 = 0.02;

    fn feed_tone(
        segmenter: &mut NoteSegmenter,
        store: &mut NoteStore,
        from_sec: f64,
        to_sec: f64,
        frequency_hz: f64,
        amplitude: f32,
    ) {
        let mut t = from_sec;
        while t < to_sec - 1e-9 {
            segmenter.process_frame(Frame::new(t, amplitude, Some(frequency_hz)), store);
            t += FRAME_STEP;
        }
    }

    #[test]
    fn test_steady_tone_yields_one_note() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        // 440 Hz from t=0 through t=2.0 inclusive
        for i in 0..=100 {
            let t = i as f64 * FRAME_STEP;
            segmenter.process_frame(Frame::new(t, 0.5, Some(440.0)), &mut store);
        }
        segmenter.flush(&mut store);

        assert_eq!(store.len(), 1);
        let note = &store.notes()[0];
        assert_eq!(note.pitch_name, "A4");
        assert_eq!(note.start_time_sec, 0.0);
        assert!((note.duration_sec - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_silence_gap_splits_notes() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        feed_tone(&mut segmenter, &mut store, 0.0, 1.0, 440.0, 0.5);
        feed_tone(&mut segmenter, &mut store, 1.0, 1.2, 0.0, 0.0);
        feed_tone(&mut segmenter, &mut store, 1.2, 2.0, 523.25, 0.5);
        segmenter.flush(&mut store);

        assert_eq!(store.len(), 2);

        let first = &store.notes()[0];
        assert_eq!(first.pitch_name, "A4");
        assert_eq!(first.start_time_sec, 0.0);
        assert!((first.duration_sec - 1.0).abs() < 0.05);

        let second = &store.notes()[1];
        assert_eq!(second.pitch_name, "C5");
        assert!((second.start_time_sec - 1.2).abs() < 1e-9);
        assert!((second.duration_sec - 0.8).abs() < 0.05);
    }

    #[test]
    fn test_large_stable_pitch_change_closes_and_reopens() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        feed_tone(&mut segmenter, &mut store, 0.0, 0.5, 440.0, 0.5);
        feed_tone(&mut segmenter, &mut store, 0.5, 1.0, 880.0, 0.5);
        segmenter.flush(&mut store);

        assert_eq!(store.len(), 2);
        assert_eq!(store.notes()[0].pitch_name, "A4");
        assert!((store.notes()[0].duration_sec - 0.5).abs() < 1e-9);
        assert_eq!(store.notes()[1].pitch_name, "A5");
        assert!((store.notes()[1].start_time_sec - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_jump_during_stabilization_is_ignored() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        segmenter.process_frame(Frame::new(0.0, 0.5, Some(440.0)), &mut store);
        // Octave blip 40 ms in: inside the 100 ms stabilization window
        segmenter.process_frame(Frame::new(0.04, 0.5, Some(880.0)), &mut store);
        segmenter.process_frame(Frame::new(0.06, 0.5, Some(440.0)), &mut store);
        segmenter.flush(&mut store);

        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].pitch_name, "A4");
    }

    #[test]
    fn test_drift_within_jump_keeps_first_label() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        segmenter.process_frame(Frame::new(0.0, 0.5, Some(440.0)), &mut store);
        // A#4 is one semitone up: same note drifting
        segmenter.process_frame(Frame::new(0.2, 0.5, Some(466.16)), &mut store);
        segmenter.process_frame(Frame::new(0.4, 0.5, Some(440.0)), &mut store);
        segmenter.flush(&mut store);

        assert_eq!(store.len(), 1);
        let note = &store.notes()[0];
        assert_eq!(note.pitch_name, "A4");
        assert!((note.duration_sec - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_frames_are_discarded() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        segmenter.process_frame(Frame::new(0.0, 0.5, None), &mut store);
        segmenter.process_frame(Frame::new(0.02, 0.5, Some(30.0)), &mut store);
        segmenter.process_frame(Frame::new(0.04, 0.5, Some(6000.0)), &mut store);
        segmenter.process_frame(Frame::new(0.06, 0.5, Some(-1.0)), &mut store);
        segmenter.flush(&mut store);

        assert!(store.is_empty());
        assert!(segmenter.active_note().is_none());
    }

    #[test]
    fn test_loud_frame_outside_musical_range_is_discarded() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        // 50 Hz is inside the frequency band but below C2 (MIDI 36)
        segmenter.process_frame(Frame::new(0.0, 0.5, Some(50.0)), &mut store);
        assert!(segmenter.active_note().is_none());
    }

    #[test]
    fn test_silence_requires_persistence_before_closing() {
        let config = SegmenterConfig {
            min_silence_gap_sec: 0.05,
            ..SegmenterConfig::default()
        };
        let mut segmenter = NoteSegmenter::with_config(config);
        let mut store = NoteStore::new();

        segmenter.process_frame(Frame::new(0.0, 0.5, Some(440.0)), &mut store);
        segmenter.process_frame(Frame::new(0.2, 0.5, Some(440.0)), &mut store);
        // One quiet frame is not yet a gap
        segmenter.process_frame(Frame::new(0.22, 0.0, None), &mut store);
        assert!(store.is_empty());
        // The tone resumes; the silence clock must have reset
        segmenter.process_frame(Frame::new(0.24, 0.5, Some(440.0)), &mut store);
        segmenter.process_frame(Frame::new(0.3, 0.0, None), &mut store);
        segmenter.process_frame(Frame::new(0.4, 0.0, None), &mut store);

        assert_eq!(store.len(), 1);
        assert!((store.notes()[0].duration_sec - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_flush_keeps_provisional_note() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        segmenter.process_frame(Frame::new(0.5, 0.5, Some(440.0)), &mut store);
        segmenter.flush(&mut store);

        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].start_time_sec, 0.5);
        assert_eq!(store.notes()[0].duration_sec, 0.0);
    }

    #[test]
    fn test_reset_discards_provisional_note() {
        let mut segmenter = NoteSegmenter::new();
        let mut store = NoteStore::new();

        segmenter.process_frame(Frame::new(0.0, 0.5, Some(440.0)), &mut store);
        segmenter.reset();
        segmenter.flush(&mut store);

        assert!(store.is_empty());
    }
}
