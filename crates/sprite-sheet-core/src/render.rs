use crate::compositing::{blit_scaled, crop_rgba, decode_rgba, encode_png};
use crate::config::RenderConfig;
use crate::error::{Result, SpriteSheetError};
use crate::model::{
    PixelSource, PositionedItem, RasterBlob, Rect, Rectangle, SpriteId, UnpositionedItem,
};
use image::RgbaImage;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, instrument, trace, warn};

/// Holds the raster the caller currently displays/persists.
///
/// Installing a new raster releases the previous one first.
#[derive(Debug, Default)]
pub struct RasterSlot {
    current: Option<RasterBlob>,
}

impl RasterSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&RasterBlob> {
        self.current.as_ref()
    }

    pub fn install(&mut self, blob: RasterBlob) {
        if let Some(old) = self.current.take() {
            trace!(width = old.width, height = old.height, "released previous raster");
            drop(old);
        }
        self.current = Some(blob);
    }

    pub fn take(&mut self) -> Option<RasterBlob> {
        self.current.take()
    }
}

/// Draws packed sprites into one PNG sheet and slices sheets back into sprites.
#[derive(Debug, Clone, Default)]
pub struct CompositeRenderer {
    cfg: RenderConfig,
}

impl CompositeRenderer {
    pub fn new(cfg: RenderConfig) -> Self {
        Self { cfg }
    }

    #[instrument(skip_all, fields(items = items.len(), width = width, height = height))]
    /// Draws every item at its rectangle onto a transparent `width x height` surface.
    ///
    /// All pixel sources are decoded concurrently on the blocking pool and the PNG is
    /// encoded only once every one of them succeeded. A single undecodable item fails
    /// the whole draw; no partial sheet is ever produced.
    pub async fn draw(
        &self,
        items: &[PositionedItem],
        width: u32,
        height: u32,
    ) -> Result<RasterBlob> {
        if items.is_empty() {
            return Ok(RasterBlob::empty());
        }
        let decoded = decode_all(items).await?;
        let targets: Vec<Rect> = items.iter().map(|it| it.rect.rect()).collect();
        let outlines = self.cfg.outlines;
        let png = run_blocking(move || {
            let mut canvas = RgbaImage::new(width, height);
            for (src, dst) in decoded.iter().zip(&targets) {
                blit_scaled(src, &mut canvas, *dst, outlines);
            }
            encode_png(&canvas)
        })
        .await?;
        debug!(bytes = png.len(), "composite encoded");
        Ok(RasterBlob {
            width,
            height,
            png: Arc::from(png),
        })
    }

    /// Draws and, on success only, installs the result into `slot`.
    pub async fn draw_into(
        &self,
        slot: &mut RasterSlot,
        items: &[PositionedItem],
        width: u32,
        height: u32,
    ) -> Result<()> {
        let blob = self.draw(items, width, height).await?;
        slot.install(blob);
        Ok(())
    }

    #[instrument(skip_all, fields(rectangles = rectangles.len()))]
    /// Slices `raster` into one new sprite per rectangle, in rectangle order.
    ///
    /// Each slice is an independent PNG carrying the rectangle's name and a fresh id.
    /// Only `(x, y, w, h, name)` survives; callers re-pack the result.
    pub async fn explode(
        &self,
        raster: &RasterBlob,
        rectangles: &[Rectangle],
    ) -> Result<Vec<UnpositionedItem>> {
        if rectangles.is_empty() {
            return Ok(Vec::new());
        }
        let png = raster.png.clone();
        let source = run_blocking(move || {
            decode_rgba(&png).map_err(|e| SpriteSheetError::Decode {
                name: "composite".into(),
                reason: e.to_string(),
            })
        })
        .await?;
        let (width, height) = source.dimensions();
        let bounds = Rect::new(0, 0, width, height);
        if let Some(r) = rectangles
            .iter()
            .find(|r| r.w == 0 || r.h == 0 || !bounds.contains(&r.rect()))
        {
            return Err(SpriteSheetError::OutOfBounds {
                name: r.name.clone(),
                rect: r.rect(),
                width,
                height,
            });
        }

        let source = Arc::new(source);
        let mut set: JoinSet<Result<(usize, UnpositionedItem)>> = JoinSet::new();
        for (idx, r) in rectangles.iter().enumerate() {
            let src = Arc::clone(&source);
            let rect = r.rect();
            let name = r.name.clone();
            set.spawn_blocking(move || -> Result<(usize, UnpositionedItem)> {
                let slice = crop_rgba(&src, rect).ok_or_else(|| SpriteSheetError::OutOfBounds {
                    name: name.clone(),
                    rect,
                    width,
                    height,
                })?;
                let png = encode_png(&slice)?;
                Ok((
                    idx,
                    UnpositionedItem {
                        id: SpriteId::new(),
                        name,
                        w: rect.w,
                        h: rect.h,
                        source: PixelSource::Encoded(Arc::from(png)),
                    },
                ))
            });
        }
        gather(set, vec![None; rectangles.len()]).await
    }
}

async fn decode_all(items: &[PositionedItem]) -> Result<Vec<Arc<RgbaImage>>> {
    let mut slots: Vec<Option<Arc<RgbaImage>>> = vec![None; items.len()];
    let mut set: JoinSet<Result<(usize, Arc<RgbaImage>)>> = JoinSet::new();
    for (idx, item) in items.iter().enumerate() {
        match &item.source {
            PixelSource::Decoded(img) => slots[idx] = Some(Arc::clone(img)),
            PixelSource::Encoded(bytes) => {
                let bytes = Arc::clone(bytes);
                let name = item.rect.name.clone();
                set.spawn_blocking(move || match decode_rgba(&bytes) {
                    Ok(img) => Ok((idx, Arc::new(img))),
                    Err(e) => Err(SpriteSheetError::Decode {
                        name,
                        reason: e.to_string(),
                    }),
                });
            }
        }
    }
    gather(set, slots).await
}

/// Join point: waits for every task to settle, then reports the first failure or
/// returns the results in input order.
async fn gather<T: Send + 'static>(
    mut set: JoinSet<Result<(usize, T)>>,
    mut slots: Vec<Option<T>>,
) -> Result<Vec<T>> {
    let mut failure: Option<SpriteSheetError> = None;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok((idx, value))) => slots[idx] = Some(value),
            Ok(Err(e)) => {
                warn!(error = %e, "sprite task failed");
                failure.get_or_insert(e);
            }
            Err(e) => {
                failure.get_or_insert(SpriteSheetError::Task(e.to_string()));
            }
        }
    }
    if let Some(err) = failure {
        return Err(err);
    }
    slots
        .into_iter()
        .map(|s| s.ok_or_else(|| SpriteSheetError::Task("missing sprite result".into())))
        .collect()
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SpriteSheetError::Task(e.to_string()))?
}
