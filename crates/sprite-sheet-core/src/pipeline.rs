use crate::config::PackerConfig;
use crate::error::{Result, SpriteSheetError};
use crate::model::{LayoutResult, PositionedItem, Rectangle, SpriteId, UnpositionedItem};
use crate::packer::{Packer, shelf::ShelfPacker};
use tracing::{debug, instrument};

/// Output of `pack_items`: the layout plus each rectangle joined with its pixels.
#[derive(Debug, Clone, Default)]
pub struct PackedSheet {
    pub layout: LayoutResult,
    pub placed: Vec<PositionedItem>,
}

#[instrument(skip_all, fields(items = items.len()))]
/// Packs `items` into one sheet with the shelf heuristic and returns the positioned rectangles.
///
/// Notes:
/// - Input order is kept; rectangle `i` belongs to item `i` and carries its id and name.
/// - Empty input yields an empty layout with a 0x0 canvas.
pub fn pack(items: &[UnpositionedItem], cfg: &PackerConfig) -> Result<LayoutResult> {
    let sizes: Vec<(SpriteId, &str, u32, u32)> = items
        .iter()
        .map(|it| (it.id, it.name.as_str(), it.w, it.h))
        .collect();
    pack_sizes(&sizes, cfg)
}

/// Like `pack`, but consumes the items and keeps their pixel sources next to the rectangles.
pub fn pack_items(items: Vec<UnpositionedItem>, cfg: &PackerConfig) -> Result<PackedSheet> {
    let layout = pack(&items, cfg)?;
    let placed = layout
        .rectangles
        .iter()
        .cloned()
        .zip(items)
        .map(|(rect, item)| PositionedItem {
            rect,
            source: item.source,
        })
        .collect();
    Ok(PackedSheet { layout, placed })
}

// ---------------- Layout-only API ----------------

/// Packs sizes without pixel data.
/// Inputs are (name, width, height); every rectangle gets a fresh id.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: &PackerConfig,
) -> Result<LayoutResult> {
    let named: Vec<(SpriteId, String, u32, u32)> = inputs
        .into_iter()
        .map(|(k, w, h)| (SpriteId::new(), k.into(), w, h))
        .collect();
    let sizes: Vec<(SpriteId, &str, u32, u32)> = named
        .iter()
        .map(|(id, name, w, h)| (*id, name.as_str(), *w, *h))
        .collect();
    pack_sizes(&sizes, cfg)
}

fn pack_sizes(sizes: &[(SpriteId, &str, u32, u32)], cfg: &PackerConfig) -> Result<LayoutResult> {
    // Validate configuration first
    cfg.validate()?;

    if sizes.is_empty() {
        return Ok(LayoutResult::default());
    }
    if let Some((_, name, w, h)) = sizes.iter().find(|(_, _, w, h)| *w == 0 || *h == 0) {
        return Err(SpriteSheetError::InvalidInput(format!(
            "sprite '{name}' has zero size ({w}x{h})"
        )));
    }

    let total_area = sizes
        .iter()
        .fold(0u64, |acc, (_, _, w, h)| acc.saturating_add(*w as u64 * *h as u64));
    let mut packer = ShelfPacker::new(cfg.target_width(total_area), cfg.padding);
    let rectangles = sizes
        .iter()
        .map(|(id, name, w, h)| match packer.place(*w, *h) {
            Some(rect) => Ok(Rectangle::with_id(*id, *name, rect)),
            None => Err(SpriteSheetError::InvalidInput(format!(
                "sprite '{name}' ({w}x{h}) does not fit on a sheet with 32-bit coordinates"
            ))),
        })
        .collect::<Result<Vec<Rectangle>>>()?;
    let (canvas_width, canvas_height) = packer.canvas_size();
    debug!(
        target_width = packer.target_width(),
        canvas_width, canvas_height, "packed sheet"
    );
    Ok(LayoutResult {
        rectangles,
        canvas_width,
        canvas_height,
    })
}
