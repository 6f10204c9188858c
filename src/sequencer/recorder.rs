// Melody recorder - the controller for one recording take
// Owns the session, the segmenter, and the note store; drives the per-frame
// loop and the stop/flush/quantize sequence

use log::{debug, info, warn};

use crate::pitch::estimator::PitchEstimator;
use crate::sequencer::note::Note;
use crate::sequencer::segmenter::{Frame, NoteSegmenter, SegmenterConfig};
use crate::sequencer::session::RecordingSession;
use crate::sequencer::store::NoteStore;

/// Recording controller.
///
/// Everything runs on one logical thread: the host scheduler calls
/// [`process_frame`]/[`process_window`] once per analysis window, and the
/// editor mutates the store between frames through [`store_mut`]. The
/// `is_recording` flag is the only cancellation primitive - the next frame
/// after it drops is ignored, and callers stop rescheduling when a process
/// call returns `false`.
///
/// [`process_frame`]: MelodyRecorder::process_frame
/// [`process_window`]: MelodyRecorder::process_window
/// [`store_mut`]: MelodyRecorder::store_mut
#[derive(Debug)]
pub struct MelodyRecorder {
    session: RecordingSession,
    segmenter: NoteSegmenter,
    store: NoteStore,
    is_recording: bool,
}

impl MelodyRecorder {
    pub fn new() -> Self {
        Self::with_session(RecordingSession::default())
    }

    pub fn with_session(session: RecordingSession) -> Self {
        Self::with_config(session, SegmenterConfig::default())
    }

    pub fn with_config(session: RecordingSession, config: SegmenterConfig) -> Self {
        Self {
            session,
            segmenter: NoteSegmenter::with_config(config),
            store: NoteStore::new(),
            is_recording: false,
        }
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Editing access for the roll editor; recording and editing never run
    /// concurrently, so no locking is needed
    pub fn store_mut(&mut self) -> &mut NoteStore {
        &mut self.store
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// Begin a new take, discarding the previous one
    pub fn start_recording(&mut self) {
        if self.is_recording {
            return;
        }
        self.store.clear();
        self.segmenter.reset();
        self.is_recording = true;
        info!("recording started: {}", self.session);
    }

    /// Feed one analysis frame.
    ///
    /// Returns `true` while the take is still running so the host scheduler
    /// knows to reschedule the next frame callback. The take force-stops
    /// once a frame's timestamp passes the session's maximum length.
    pub fn process_frame(&mut self, frame: Frame) -> bool {
        if !self.is_recording {
            return false;
        }
        if self.session.is_past_take_end(frame.time_sec) {
            debug!(
                "take limit of {:.2}s reached at t={:.2}s",
                self.session.max_take_sec(),
                frame.time_sec
            );
            self.stop_recording();
            return false;
        }
        self.segmenter.process_frame(frame, &mut self.store);
        true
    }

    /// Feed one raw capture window, running the estimator for it.
    ///
    /// Peak amplitude is `max(|sample|)` over the window - the capture
    /// boundary's contract.
    pub fn process_window(
        &mut self,
        samples: &[f32],
        sample_rate_hz: u32,
        time_sec: f64,
        estimator: &mut dyn PitchEstimator,
    ) -> bool {
        let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
        let frequency_hz = estimator.estimate(samples, sample_rate_hz);
        self.process_frame(Frame::new(time_sec, peak, frequency_hz))
    }

    /// Stop the take: flush the provisional note, then run the post-stop
    /// quantize pass. Idempotent.
    pub fn stop_recording(&mut self) {
        if !self.is_recording {
            return;
        }
        self.is_recording = false;
        self.segmenter.flush(&mut self.store);
        self.store.quantize_all(self.session.bpm());
        info!("recording stopped, {} notes in the take", self.store.len());
    }

    /// Change the tempo, rescaling the take so notes keep their bar/beat
    /// positions. Returns `false` (and does nothing) while recording or for
    /// an out-of-range BPM.
    pub fn change_bpm(&mut self, new_bpm: u32) -> bool {
        if self.is_recording {
            warn!("ignoring BPM change during recording");
            return false;
        }
        if !RecordingSession::is_valid_bpm(new_bpm) {
            warn!("ignoring out-of-range BPM {new_bpm}");
            return false;
        }
        let old_bpm = self.session.bpm();
        if old_bpm != new_bpm {
            self.store.rescale_for_tempo_change(old_bpm, new_bpm);
            self.session.set_bpm(new_bpm);
        }
        true
    }

    /// Replace the take with imported notes at their own tempo.
    /// Import data is trusted; collision checks are bypassed.
    pub fn load_take(&mut self, bpm: u32, notes: Vec<Note>) -> bool {
        if self.is_recording || !RecordingSession::is_valid_bpm(bpm) {
            return false;
        }
        self.session.set_bpm(bpm);
        self.store.replace_all(notes);
        true
    }

    /// Drop the take and return to a clean idle state.
    /// The session keeps its tempo but falls back to the default take length.
    pub fn reset_take(&mut self) {
        self.is_recording = false;
        self.segmenter.reset();
        self.store.clear();
        self.session = RecordingSession::new(self.session.bpm());
    }
}

impl Default for MelodyRecorder {
    fn default() -> Self {
        Self::new()
    }
}
