// Roll editor - pointer gestures over the note store
// One tagged gesture state instead of a pile of is-dragging booleans

use crate::roll::geometry::{HitRegion, RollGeometry};
use crate::sequencer::note::Note;
use crate::sequencer::store::{EditError, NoteStore};

/// The pointer gesture currently in progress.
///
/// Grab offsets keep the note from jumping to the pointer when a drag
/// starts mid-body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditGesture {
    Idle,
    Moving {
        index: usize,
        grab_offset_x: f64,
        grab_offset_y: f64,
    },
    ResizingStart {
        index: usize,
    },
    ResizingEnd {
        index: usize,
    },
}

/// Drives note edits from pointer and keyboard input.
///
/// The editor owns only interaction state (gesture + selection); every
/// mutation goes through the store's editing operations, so a rejected edit
/// leaves the take untouched and surfaces the `EditError` to the caller.
#[derive(Debug)]
pub struct RollEditor {
    geometry: RollGeometry,
    gesture: EditGesture,
    selected: Option<usize>,
}

impl RollEditor {
    pub fn new() -> Self {
        Self::with_geometry(RollGeometry::default())
    }

    pub fn with_geometry(geometry: RollGeometry) -> Self {
        Self {
            geometry,
            gesture: EditGesture::Idle,
            selected: None,
        }
    }

    pub fn geometry(&self) -> &RollGeometry {
        &self.geometry
    }

    pub fn gesture(&self) -> EditGesture {
        self.gesture
    }

    /// Index the renderer should highlight, if any
    pub fn selected_note_index(&self) -> Option<usize> {
        self.selected
    }

    /// Pointer pressed: pick a note (edge or body) or deselect on empty
    /// space
    pub fn pointer_down(&mut self, x: f64, y: f64, store: &NoteStore, bpm: u32) {
        match self.geometry.hit_test(x, y, store.notes(), bpm) {
            Some((index, HitRegion::StartEdge)) => {
                self.selected = Some(index);
                self.gesture = EditGesture::ResizingStart { index };
            }
            Some((index, HitRegion::EndEdge)) => {
                self.selected = Some(index);
                self.gesture = EditGesture::ResizingEnd { index };
            }
            Some((index, HitRegion::Body)) => {
                let bounds = self.geometry.note_bounds(&store.notes()[index], bpm);
                self.selected = Some(index);
                self.gesture = EditGesture::Moving {
                    index,
                    grab_offset_x: x - bounds.x_start,
                    grab_offset_y: y - bounds.y_center,
                };
            }
            None => {
                self.selected = None;
                self.gesture = EditGesture::Idle;
            }
        }
    }

    /// Pointer dragged: apply the armed gesture through the store.
    ///
    /// A rejected edit (overlap, range, minimum duration) is returned to the
    /// caller and the note stays where it was; the gesture stays armed so
    /// the user can keep dragging toward a legal position.
    pub fn pointer_move(&mut self, x: f64, y: f64, store: &mut NoteStore, bpm: u32) -> Result<(), EditError> {
        match self.gesture {
            EditGesture::Idle => Ok(()),
            EditGesture::ResizingStart { index } => {
                store.resize_start(index, self.geometry.x_to_time(x, bpm).max(0.0))
            }
            EditGesture::ResizingEnd { index } => {
                store.resize_end(index, self.geometry.x_to_time(x, bpm))
            }
            EditGesture::Moving {
                index,
                grab_offset_x,
                grab_offset_y,
            } => {
                let new_start = self.geometry.x_to_time(x - grab_offset_x, bpm).max(0.0);
                let new_midi = self.geometry.y_to_midi(y - grab_offset_y);
                store.move_note(index, new_start, new_midi, bpm)
            }
        }
    }

    /// Pointer released: disarm the gesture, keep the selection
    pub fn pointer_up(&mut self) {
        self.gesture = EditGesture::Idle;
    }

    /// Delete the selected note (the Delete-key path).
    ///
    /// Returns the removed note, or `None` when nothing was selected.
    pub fn delete_selected(&mut self, store: &mut NoteStore) -> Result<Option<Note>, EditError> {
        let Some(index) = self.selected.take() else {
            return Ok(None);
        };
        self.gesture = EditGesture::Idle;
        store.delete(index).map(Some)
    }
}

impl Default for RollEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_a4() -> NoteStore {
        let mut store = NoteStore::new();
        store.append(Note::new("A4", 0.5, 1.0));
        store
    }

    // With the default geometry at 120 BPM the A4 note spans x 200..400
    // and its row center is y = 790.

    #[test]
    fn test_body_press_arms_move_with_grab_offset() {
        let store = store_with_a4();
        let mut editor = RollEditor::new();

        editor.pointer_down(250.0, 790.0, &store, 120);
        assert_eq!(editor.selected_note_index(), Some(0));
        assert_eq!(
            editor.gesture(),
            EditGesture::Moving {
                index: 0,
                grab_offset_x: 50.0,
                grab_offset_y: 0.0
            }
        );
    }

    #[test]
    fn test_drag_moves_note_on_grid() {
        let mut store = store_with_a4();
        let mut editor = RollEditor::new();

        editor.pointer_down(250.0, 790.0, &store, 120);
        // 100 px right of the grab point = one beat later
        editor.pointer_move(350.0, 790.0, &mut store, 120).unwrap();
        editor.pointer_up();

        let note = &store.notes()[0];
        assert!((note.start_time_sec - 1.0).abs() < 1e-12);
        assert_eq!(note.pitch_name, "A4");
        assert_eq!(editor.gesture(), EditGesture::Idle);
        assert_eq!(editor.selected_note_index(), Some(0));
    }

    #[test]
    fn test_drag_changes_pitch() {
        let mut store = store_with_a4();
        let mut editor = RollEditor::new();

        editor.pointer_down(250.0, 790.0, &store, 120);
        // Three rows up lands on C5 (MIDI 72)
        editor.pointer_move(250.0, 730.0, &mut store, 120).unwrap();

        let note = &store.notes()[0];
        assert_eq!(note.pitch_name, "C5");
        assert!((note.start_time_sec - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_drag_above_roll_clamps_to_c8() {
        let mut store = store_with_a4();
        let mut editor = RollEditor::new();

        editor.pointer_down(250.0, 790.0, &store, 120);
        editor.pointer_move(250.0, -500.0, &mut store, 120).unwrap();
        assert_eq!(store.notes()[0].pitch_name, "C8");
    }

    #[test]
    fn test_rejected_drag_keeps_note_and_gesture() {
        let mut store = store_with_a4();
        store.append(Note::new("A4", 2.0, 1.0));
        let mut editor = RollEditor::new();

        editor.pointer_down(250.0, 790.0, &store, 120);
        // Dragging onto the second A4 note is a collision
        let x_target = editor.geometry().time_to_x(2.0, 120) + 50.0;
        assert_eq!(
            editor.pointer_move(x_target, 790.0, &mut store, 120),
            Err(EditError::OverlapViolation)
        );
        assert!((store.notes()[0].start_time_sec - 0.5).abs() < 1e-12);
        assert!(matches!(editor.gesture(), EditGesture::Moving { .. }));
    }

    #[test]
    fn test_start_edge_press_resizes_onset() {
        let mut store = store_with_a4();
        let mut editor = RollEditor::new();

        editor.pointer_down(200.0, 790.0, &store, 120);
        assert_eq!(editor.gesture(), EditGesture::ResizingStart { index: 0 });

        editor.pointer_move(150.0, 790.0, &mut store, 120).unwrap();
        let note = &store.notes()[0];
        assert!((note.start_time_sec - 0.25).abs() < 1e-12);
        assert!((note.duration_sec - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_end_edge_press_resizes_release() {
        let mut store = store_with_a4();
        let mut editor = RollEditor::new();

        editor.pointer_down(400.0, 790.0, &store, 120);
        assert_eq!(editor.gesture(), EditGesture::ResizingEnd { index: 0 });

        editor.pointer_move(500.0, 790.0, &mut store, 120).unwrap();
        let note = &store.notes()[0];
        assert!((note.duration_sec - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_space_press_deselects() {
        let store = store_with_a4();
        let mut editor = RollEditor::new();

        editor.pointer_down(250.0, 790.0, &store, 120);
        assert_eq!(editor.selected_note_index(), Some(0));

        editor.pointer_down(900.0, 790.0, &store, 120);
        assert_eq!(editor.selected_note_index(), None);
        assert_eq!(editor.gesture(), EditGesture::Idle);
    }

    #[test]
    fn test_delete_selected() {
        let mut store = store_with_a4();
        let mut editor = RollEditor::new();

        editor.pointer_down(250.0, 790.0, &store, 120);
        editor.pointer_up();
        let removed = editor.delete_selected(&mut store).unwrap();
        assert_eq!(removed.map(|n| n.pitch_name), Some("A4".to_string()));
        assert!(store.is_empty());
        assert_eq!(editor.selected_note_index(), None);

        // Nothing selected anymore: a no-op, not an error
        assert_eq!(editor.delete_selected(&mut store), Ok(None));
    }

    #[test]
    fn test_move_without_press_is_noop() {
        let mut store = store_with_a4();
        let mut editor = RollEditor::new();
        editor.pointer_move(300.0, 790.0, &mut store, 120).unwrap();
        assert!((store.notes()[0].start_time_sec - 0.5).abs() < 1e-12);
    }
}
