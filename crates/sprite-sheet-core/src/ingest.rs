use crate::error::{Result, SpriteSheetError};
use crate::model::{PixelSource, SpriteId, UnpositionedItem};
use crate::session::sanitize_name;
use image::DynamicImage;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Ingests raw encoded bytes (pasted or uploaded) of any format the `image` crate
/// can recognize. Only the header is read here; pixels are decoded at draw time.
pub fn ingest_bytes(name: &str, bytes: impl Into<Arc<[u8]>>) -> Result<UnpositionedItem> {
    let bytes: Arc<[u8]> = bytes.into();
    let (w, h) = image::ImageReader::new(Cursor::new(&bytes[..]))
        .with_guessed_format()?
        .into_dimensions()?;
    let item = new_item(name, w, h, PixelSource::Encoded(bytes))?;
    debug!(name = %item.name, w, h, "ingested encoded image");
    Ok(item)
}

/// Ingests an already decoded image.
pub fn ingest_image(name: &str, image: DynamicImage) -> Result<UnpositionedItem> {
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    new_item(name, w, h, PixelSource::Decoded(Arc::new(rgba)))
}

fn new_item(name: &str, w: u32, h: u32, source: PixelSource) -> Result<UnpositionedItem> {
    if w == 0 || h == 0 {
        return Err(SpriteSheetError::InvalidInput(format!(
            "image '{name}' has zero size ({w}x{h})"
        )));
    }
    Ok(UnpositionedItem {
        id: SpriteId::new(),
        name: sanitize_name(name),
        w,
        h,
        source,
    })
}
