use crate::error::{Result, SpriteSheetError};
use crate::model::Rect;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::io::Cursor;

/// Blit `src` into `canvas` so that it covers exactly `dst`, then optionally draw
/// a red outline around `dst` for debugging.
///
/// - sources already sized `dst.w x dst.h` are copied verbatim
/// - other sources are resized with a triangle filter first
/// - pixels falling outside the canvas are dropped
pub fn blit_scaled(src: &RgbaImage, canvas: &mut RgbaImage, dst: Rect, outlines: bool) {
    let (cw, ch) = canvas.dimensions();
    let resized;
    let pixels = if src.dimensions() == (dst.w, dst.h) {
        src
    } else {
        resized = imageops::resize(src, dst.w, dst.h, FilterType::Triangle);
        &resized
    };

    // main blit
    for yy in 0..dst.h {
        for xx in 0..dst.w {
            if dst.x + xx < cw && dst.y + yy < ch {
                let px = *pixels.get_pixel(xx, yy);
                canvas.put_pixel(dst.x + xx, dst.y + yy, px);
            }
        }
    }

    if outlines {
        // red outline on frame bounds
        let red = Rgba([255, 0, 0, 255]);
        for xx in 0..dst.w {
            if dst.x + xx < cw && dst.y < ch {
                canvas.put_pixel(dst.x + xx, dst.y, red);
            }
            let by = dst.bottom();
            if dst.x + xx < cw && by < ch {
                canvas.put_pixel(dst.x + xx, by, red);
            }
        }
        for yy in 0..dst.h {
            if dst.x < cw && dst.y + yy < ch {
                canvas.put_pixel(dst.x, dst.y + yy, red);
            }
            let rx = dst.right();
            if rx < cw && dst.y + yy < ch {
                canvas.put_pixel(rx, dst.y + yy, red);
            }
        }
    }
}

/// Copies the `rect` sub-region of `src` into a new independent buffer.
/// Returns `None` when `rect` is empty or not fully inside `src`.
pub fn crop_rgba(src: &RgbaImage, rect: Rect) -> Option<RgbaImage> {
    let (w, h) = src.dimensions();
    if rect.w == 0 || rect.h == 0 || w == 0 || h == 0 {
        return None;
    }
    if !Rect::new(0, 0, w, h).contains(&rect) {
        return None;
    }
    Some(imageops::crop_imm(src, rect.x, rect.y, rect.w, rect.h).to_image())
}

/// Decodes any image format the `image` crate can guess into RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    Ok(img.to_rgba8())
}

/// Encodes an RGBA buffer as PNG.
pub fn encode_png(rgba: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| SpriteSheetError::Encode(e.to_string()))?;
    Ok(out)
}
