use crate::model::Rect;

pub mod shelf;

/// A packer places sprites onto a single growing sheet.
///
/// Implementations must ensure no overlaps. The sheet grows to fit, so callers read
/// the final size from `canvas_size`. `place` returns `None` only when the sprite's
/// far edge would not fit in `u32` coordinates.
pub trait Packer {
    fn place(&mut self, w: u32, h: u32) -> Option<Rect>;
    /// Tight bounding size of everything placed so far.
    fn canvas_size(&self) -> (u32, u32);
}
