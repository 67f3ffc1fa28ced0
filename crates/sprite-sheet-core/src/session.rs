use crate::error::{Result, SpriteSheetError};
use crate::model::{LayoutResult, Rect, Rectangle, SpriteId, UnpositionedItem};
use crate::url_state;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How the session's sheet came to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    /// One existing image with rectangles drawn on top of it.
    #[default]
    SingleImage,
    /// A sheet built by packing individually ingested images.
    MultiItemBuild,
}

/// Persistable view of a pending item (no pixels).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub id: SpriteId,
    pub name: String,
    pub w: u32,
    pub h: u32,
}

/// Everything about a session except pixel handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub mode: SessionMode,
    pub rectangles: Vec<Rectangle>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    #[serde(default)]
    pub pending: Vec<PendingEntry>,
}

/// Snapshot of an editing session.
///
/// Operations never mutate in place: each one returns the next snapshot, which the
/// owner installs (and persists) as it sees fit.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub mode: SessionMode,
    pub rectangles: Vec<Rectangle>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Only meaningful in `MultiItemBuild` mode.
    pub pending: Vec<UnpositionedItem>,
}

impl SessionState {
    /// Session over one existing `width x height` image.
    pub fn single_image(width: u32, height: u32) -> Self {
        Self {
            mode: SessionMode::SingleImage,
            canvas_width: width,
            canvas_height: height,
            ..Default::default()
        }
    }

    /// Empty session that builds a sheet from ingested images.
    pub fn multi_item() -> Self {
        Self {
            mode: SessionMode::MultiItemBuild,
            ..Default::default()
        }
    }

    pub fn rectangle(&self, id: SpriteId) -> Option<&Rectangle> {
        self.rectangles.iter().find(|r| r.id == id)
    }

    /// Adds a hand-drawn rectangle. The name is sanitized; zero-sized rectangles and,
    /// once the canvas has a size, rectangles leaving it are rejected.
    pub fn with_rectangle(&self, name: &str, rect: Rect) -> Result<Self> {
        if rect.w == 0 || rect.h == 0 {
            return Err(SpriteSheetError::InvalidInput(format!(
                "rectangle '{name}' has zero size ({}x{})",
                rect.w, rect.h
            )));
        }
        if self.canvas_width > 0 && self.canvas_height > 0 {
            let canvas = Rect::new(0, 0, self.canvas_width, self.canvas_height);
            if !canvas.contains(&rect) {
                return Err(SpriteSheetError::OutOfBounds {
                    name: name.to_string(),
                    rect,
                    width: self.canvas_width,
                    height: self.canvas_height,
                });
            }
        }
        let mut next = self.clone();
        next.rectangles.push(Rectangle::new(sanitize_name(name), rect));
        Ok(next)
    }

    pub fn without_rectangle(&self, id: SpriteId) -> Self {
        let mut next = self.clone();
        next.rectangles.retain(|r| r.id != id);
        next
    }

    /// Renames rectangle `id`; unknown ids leave the snapshot unchanged.
    pub fn renamed(&self, id: SpriteId, name: &str) -> Self {
        let mut next = self.clone();
        if let Some(r) = next.rectangles.iter_mut().find(|r| r.id == id) {
            r.name = sanitize_name(name);
        }
        next
    }

    /// Queues an ingested item for the next pack; switches to multi-item build.
    pub fn with_pending(&self, item: UnpositionedItem) -> Self {
        let mut next = self.clone();
        next.mode = SessionMode::MultiItemBuild;
        next.pending.push(item);
        next
    }

    /// Installs a fresh layout: its rectangles replace the current ones and the
    /// pending queue, now packed, is emptied.
    pub fn with_layout(&self, layout: LayoutResult) -> Self {
        Self {
            mode: SessionMode::MultiItemBuild,
            rectangles: layout.rectangles,
            canvas_width: layout.canvas_width,
            canvas_height: layout.canvas_height,
            pending: Vec::new(),
        }
    }

    /// Empty session in the same mode.
    pub fn cleared(&self) -> Self {
        Self {
            mode: self.mode,
            ..Default::default()
        }
    }

    pub fn layout(&self) -> LayoutResult {
        LayoutResult {
            rectangles: self.rectangles.clone(),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
        }
    }

    /// Strips pixel handles, keeping only plain structural fields.
    pub fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            mode: self.mode,
            rectangles: self.rectangles.clone(),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            pending: self
                .pending
                .iter()
                .map(|it| PendingEntry {
                    id: it.id,
                    name: it.name.clone(),
                    w: it.w,
                    h: it.h,
                })
                .collect(),
        }
    }

    /// Restores a session from persisted metadata. Pending entries have no pixels
    /// left to draw, so they are dropped.
    pub fn from_metadata(meta: SessionMetadata) -> Self {
        if !meta.pending.is_empty() {
            warn!(count = meta.pending.len(), "dropping pending items without pixels");
        }
        Self {
            mode: meta.mode,
            rectangles: meta.rectangles,
            canvas_width: meta.canvas_width,
            canvas_height: meta.canvas_height,
            pending: Vec::new(),
        }
    }

    /// URL fragment sharing the current rectangles.
    pub fn fragment(&self) -> String {
        url_state::to_fragment(&self.rectangles)
    }
}

/// Turns any label into `[A-Za-z0-9_-]+`: other characters become `-`, and an
/// empty label becomes `sprite`.
pub fn sanitize_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "sprite".into()
    } else {
        cleaned
    }
}
