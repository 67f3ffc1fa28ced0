use super::Packer;
use crate::model::Rect;

/// Greedy row-based placement in input order.
///
/// Items go left to right and wrap to a new row once the next one would cross
/// `target_width`. The first item of a row never wraps, so an item wider than the
/// target widens the sheet instead.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    target_width: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    canvas_width: u32,
}

impl ShelfPacker {
    pub fn new(target_width: u32, padding: u32) -> Self {
        Self {
            target_width,
            padding,
            cursor_x: 0,
            cursor_y: 0,
            row_height: 0,
            canvas_width: 0,
        }
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }
}

impl Packer for ShelfPacker {
    fn place(&mut self, w: u32, h: u32) -> Option<Rect> {
        if self.cursor_x > 0 && self.cursor_x.saturating_add(w) > self.target_width {
            self.cursor_y = self
                .cursor_y
                .checked_add(self.row_height)?
                .checked_add(self.padding)?;
            self.cursor_x = 0;
            self.row_height = 0;
        }
        let right = self.cursor_x.checked_add(w)?;
        self.cursor_y.checked_add(h)?;
        let rect = Rect::new(self.cursor_x, self.cursor_y, w, h);
        self.cursor_x = right.saturating_add(self.padding);
        self.row_height = self.row_height.max(h);
        self.canvas_width = self.canvas_width.max(right);
        Some(rect)
    }

    fn canvas_size(&self) -> (u32, u32) {
        if self.canvas_width == 0 {
            return (0, 0);
        }
        (self.canvas_width, self.cursor_y + self.row_height)
    }
}
