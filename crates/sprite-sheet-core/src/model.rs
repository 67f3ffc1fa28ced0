use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w.saturating_sub(1))
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h.saturating_sub(1))
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        let (ax2, ay2) = (self.x as u64 + self.w as u64, self.y as u64 + self.h as u64);
        let (bx2, by2) = (r.x as u64 + r.w as u64, r.y as u64 + r.h as u64);
        !(self.x as u64 >= bx2 || r.x as u64 >= ax2 || self.y as u64 >= by2 || r.y as u64 >= ay2)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
}

/// Identity of a sprite within a session. Never part of any wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(Uuid);

impl SpriteId {
    /// Mints a fresh, random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named, positioned region of the composite raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub id: SpriteId,
    /// Sanitized label, `[A-Za-z0-9_-]+`.
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rectangle {
    /// Creates a rectangle with a freshly minted id.
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self::with_id(SpriteId::new(), name, rect)
    }

    pub fn with_id(id: SpriteId, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Pixel capability of a sprite. Shared cheaply, never serialized.
#[derive(Clone)]
pub enum PixelSource {
    /// Already decoded RGBA pixels.
    Decoded(Arc<RgbaImage>),
    /// Encoded image bytes (any format the `image` crate can guess) still to be decoded.
    Encoded(Arc<[u8]>),
}

impl PixelSource {
    pub fn is_decoded(&self) -> bool {
        matches!(self, PixelSource::Decoded(_))
    }
}

impl fmt::Debug for PixelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelSource::Decoded(img) => {
                write!(f, "Decoded({}x{})", img.width(), img.height())
            }
            PixelSource::Encoded(bytes) => write!(f, "Encoded({} bytes)", bytes.len()),
        }
    }
}

/// An ingested image waiting to be placed.
#[derive(Debug, Clone)]
pub struct UnpositionedItem {
    pub id: SpriteId,
    pub name: String,
    pub w: u32,
    pub h: u32,
    pub source: PixelSource,
}

/// A placed rectangle joined with the pixels to draw into it.
#[derive(Debug, Clone)]
pub struct PositionedItem {
    pub rect: Rectangle,
    pub source: PixelSource,
}

/// Placed rectangles plus the tight canvas size that holds them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub rectangles: Vec<Rectangle>,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }

    /// Computes packing statistics for this layout.
    pub fn stats(&self) -> LayoutStats {
        let canvas_area = (self.canvas_width as u64) * (self.canvas_height as u64);
        let mut used_area = 0u64;
        let mut max_sprite_width = 0u32;
        let mut max_sprite_height = 0u32;
        for r in &self.rectangles {
            used_area += r.rect().area();
            max_sprite_width = max_sprite_width.max(r.w);
            max_sprite_height = max_sprite_height.max(r.h);
        }
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        LayoutStats {
            num_sprites: self.rectangles.len(),
            canvas_area,
            used_area,
            occupancy,
            max_sprite_width,
            max_sprite_height,
        }
    }
}

/// Statistics about sheet packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutStats {
    pub num_sprites: usize,
    /// `canvas_width * canvas_height`.
    pub canvas_area: u64,
    /// Sum of sprite areas.
    pub used_area: u64,
    /// used_area / canvas_area (0.0 to 1.0). Padding counts as waste.
    pub occupancy: f64,
    pub max_sprite_width: u32,
    pub max_sprite_height: u32,
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sprites: {}, Occupancy: {:.2}%, Canvas Area: {} px², Used Area: {} px², Largest: {}x{}",
            self.num_sprites,
            self.occupancy * 100.0,
            self.canvas_area,
            self.used_area,
            self.max_sprite_width,
            self.max_sprite_height,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.canvas_area > 0 {
            (self.wasted_area() as f64 / self.canvas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Encoded composite raster (PNG bytes) and its dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBlob {
    pub width: u32,
    pub height: u32,
    pub png: Arc<[u8]>,
}

impl RasterBlob {
    /// The blank raster produced for an empty sheet.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            png: Arc::from(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}

impl fmt::Debug for RasterBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterBlob")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}
