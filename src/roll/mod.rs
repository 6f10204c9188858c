// Piano-roll domain: pixel geometry and the pointer-driven editor

pub mod editor;
pub mod geometry;

pub use editor::{EditGesture, RollEditor};
pub use geometry::{EDGE_THRESHOLD_PX, HitRegion, NoteBounds, RollGeometry};
