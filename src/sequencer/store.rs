// Note store - the single owner of the recorded take
// All interactive edits go through here and are all-or-nothing

use crate::pitch::math::{MIDI_MAX, MIDI_MIN};
use crate::sequencer::note::Note;

/// Shortest duration an interactive edit may leave behind, in seconds
pub const MIN_NOTE_DURATION_SEC: f64 = 0.1;

/// Rejected-edit conditions. The store is left untouched whenever one of
/// these is returned, so the caller can simply surface it and let the user
/// retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("note index {index} out of range ({len} notes in the take)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("pitch would leave the playable range C2..C8")]
    RangeViolation,

    #[error("note would overlap another note at the same pitch")]
    OverlapViolation,

    #[error("note would shrink below the minimum duration")]
    DurationTooShort,
}

/// Sixteenth-note grid step at a given tempo
pub fn sixteenth_grid_sec(bpm: u32) -> f64 {
    (60.0 / bpm as f64) / 4.0
}

/// Snap a time to the nearest multiple of the grid step
pub fn snap_to_grid(time_sec: f64, grid_sec: f64) -> f64 {
    (time_sec / grid_sec).round() * grid_sec
}

/// The ordered note sequence of the current take.
///
/// Notes stay in insertion order (recording order); nothing re-sorts them.
/// The segmenter appends, the import path bulk-replaces, and every other
/// mutation is one of the editing operations below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Append a finalized note. Segmentation path only: a monophonic source
    /// is trusted to produce temporally disjoint notes, so there is no
    /// overlap check here.
    pub fn append(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Replace the whole take with imported notes. Import data is trusted;
    /// collision checks are bypassed.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Remove and return the note at `index`
    pub fn delete(&mut self, index: usize) -> Result<Note, EditError> {
        self.check_index(index)?;
        Ok(self.notes.remove(index))
    }

    /// Move a note to a new start time and pitch.
    ///
    /// The start time is snapped to the sixteenth grid and floored at zero.
    /// `new_midi` is expected pre-clamped by the pointer-mapping layer; a
    /// value outside C2..C8 is rejected, not clamped. A move that would
    /// collide with another note at the same pitch is rejected.
    pub fn move_note(
        &mut self,
        index: usize,
        new_start_sec: f64,
        new_midi: i32,
        bpm: u32,
    ) -> Result<(), EditError> {
        self.check_index(index)?;
        if !(MIDI_MIN..=MIDI_MAX).contains(&new_midi) {
            return Err(EditError::RangeViolation);
        }

        let snapped_start = snap_to_grid(new_start_sec, sixteenth_grid_sec(bpm)).max(0.0);
        let duration = self.notes[index].duration_sec;
        if self.collides(index, new_midi, snapped_start, snapped_start + duration) {
            return Err(EditError::OverlapViolation);
        }

        let note = &mut self.notes[index];
        note.start_time_sec = snapped_start;
        note.set_midi(new_midi);
        Ok(())
    }

    /// Drag the left edge of a note, keeping its end fixed.
    ///
    /// Rejected when the note would shrink below the minimum duration or
    /// grow backwards into a same-pitch neighbour.
    pub fn resize_start(&mut self, index: usize, new_start_sec: f64) -> Result<(), EditError> {
        self.check_index(index)?;
        let note = &self.notes[index];
        let new_start = new_start_sec.max(0.0);
        let new_duration = note.end_time_sec() - new_start;
        if new_duration < MIN_NOTE_DURATION_SEC {
            return Err(EditError::DurationTooShort);
        }
        if self.collides(index, note.midi(), new_start, new_start + new_duration) {
            return Err(EditError::OverlapViolation);
        }

        let note = &mut self.notes[index];
        note.start_time_sec = new_start;
        note.duration_sec = new_duration;
        Ok(())
    }

    /// Drag the right edge of a note, keeping its start fixed.
    ///
    /// The duration is clamped to the minimum rather than rejected, but
    /// growing into a same-pitch neighbour is still a rejected edit.
    pub fn resize_end(&mut self, index: usize, new_end_sec: f64) -> Result<(), EditError> {
        self.check_index(index)?;
        let note = &self.notes[index];
        let new_duration = (new_end_sec - note.start_time_sec).max(MIN_NOTE_DURATION_SEC);
        let start = note.start_time_sec;
        if self.collides(index, note.midi(), start, start + new_duration) {
            return Err(EditError::OverlapViolation);
        }

        self.notes[index].duration_sec = new_duration;
        Ok(())
    }

    /// Transpose the whole take by one octave up or down.
    ///
    /// Every note is validated against C2..C8 first; if any would land
    /// outside, nothing moves and `RangeViolation` is returned.
    pub fn shift_octave(&mut self, direction: i32) -> Result<(), EditError> {
        assert!(
            direction == 1 || direction == -1,
            "octave shift direction must be +1 or -1"
        );

        let shifted: Vec<i32> = self.notes.iter().map(|n| n.midi() + 12 * direction).collect();
        if shifted
            .iter()
            .any(|midi| !(MIDI_MIN..=MIDI_MAX).contains(midi))
        {
            return Err(EditError::RangeViolation);
        }

        for (note, midi) in self.notes.iter_mut().zip(shifted) {
            note.set_midi(midi);
        }
        Ok(())
    }

    /// Snap every note's start and duration to the sixteenth grid.
    ///
    /// Durations are floored at one grid step so a short blip cannot
    /// quantize down to nothing; the floor is itself on-grid, which keeps
    /// the operation idempotent.
    pub fn quantize_all(&mut self, bpm: u32) {
        let grid = sixteenth_grid_sec(bpm);
        for note in &mut self.notes {
            note.start_time_sec = snap_to_grid(note.start_time_sec, grid).max(0.0);
            note.duration_sec = snap_to_grid(note.duration_sec, grid).max(grid);
        }
    }

    /// Rescale every note so bar/beat positions survive a tempo change.
    ///
    /// Multiplies starts and durations by `old_bpm / new_bpm`; applying the
    /// inverse change restores the original values up to float tolerance.
    pub fn rescale_for_tempo_change(&mut self, old_bpm: u32, new_bpm: u32) {
        let scale = old_bpm as f64 / new_bpm as f64;
        for note in &mut self.notes {
            note.start_time_sec *= scale;
            note.duration_sec *= scale;
        }
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.notes.len() {
            Ok(())
        } else {
            Err(EditError::IndexOutOfRange {
                index,
                len: self.notes.len(),
            })
        }
    }

    /// Same-pitch, half-open-interval collision against every other note.
    /// Different MIDI numbers never collide (monophonic-source assumption).
    fn collides(&self, exclude: usize, midi: i32, start_sec: f64, end_sec: f64) -> bool {
        self.notes.iter().enumerate().any(|(i, note)| {
            i != exclude && note.midi() == midi && note.overlaps_span(start_sec, end_sec)
        })
    }
}
