use image::{DynamicImage, ImageFormat};
use sprite_sheet_core::error::SpriteSheetError;
use sprite_sheet_core::prelude::*;
use std::io::Cursor;

fn encoded(w: u32, h: u32, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(w, h)
        .write_to(&mut out, format)
        .expect("encode");
    out.into_inner()
}

#[test]
fn operations_return_new_snapshots() {
    let empty = SessionState::single_image(100, 80);
    let one = empty
        .with_rectangle("hero", Rect::new(10, 10, 20, 30))
        .expect("add");
    assert!(empty.rectangles.is_empty());
    assert_eq!(one.rectangles.len(), 1);

    let id = one.rectangles[0].id;
    let renamed = one.renamed(id, "hero idle");
    assert_eq!(one.rectangle(id).map(|r| r.name.as_str()), Some("hero"));
    assert_eq!(renamed.rectangle(id).map(|r| r.name.as_str()), Some("hero-idle"));

    let removed = renamed.without_rectangle(id);
    assert!(removed.rectangles.is_empty());
    assert_eq!(renamed.rectangles.len(), 1);
}

#[test]
fn rectangles_get_unique_ids() {
    let state = SessionState::single_image(10, 10)
        .with_rectangle("a", Rect::new(0, 0, 1, 1))
        .and_then(|s| s.with_rectangle("a", Rect::new(0, 0, 1, 1)))
        .expect("add");
    assert_ne!(state.rectangles[0].id, state.rectangles[1].id);
}

#[test]
fn invalid_rectangles_are_rejected() {
    let state = SessionState::single_image(50, 50);
    assert!(matches!(
        state.with_rectangle("flat", Rect::new(0, 0, 0, 5)),
        Err(SpriteSheetError::InvalidInput(_))
    ));
    assert!(matches!(
        state.with_rectangle("past-edge", Rect::new(40, 40, 20, 5)),
        Err(SpriteSheetError::OutOfBounds { .. })
    ));
    // an unsized canvas accepts any non-empty rectangle
    assert!(
        SessionState::multi_item()
            .with_rectangle("free", Rect::new(900, 900, 5, 5))
            .is_ok()
    );
}

#[test]
fn pending_items_pack_into_a_layout() {
    let a = ingest_bytes("a.png", encoded(20, 10, ImageFormat::Png)).expect("png");
    let b = ingest_bytes("b", encoded(8, 8, ImageFormat::Bmp)).expect("bmp");
    let state = SessionState::single_image(0, 0)
        .with_pending(a.clone())
        .with_pending(b);
    assert_eq!(state.mode, SessionMode::MultiItemBuild);
    assert_eq!(state.pending.len(), 2);

    let layout = pack(&state.pending, &PackerConfig::default()).expect("pack");
    let packed = state.with_layout(layout.clone());
    assert!(packed.pending.is_empty());
    assert_eq!(packed.layout(), layout);
    assert_eq!(packed.rectangles[0].id, a.id);
    assert_eq!(packed.rectangles[0].name, "a-png");
    assert_eq!((packed.canvas_width, packed.canvas_height), (30, 10));
}

#[test]
fn cleared_keeps_mode_only() {
    let state = SessionState::multi_item()
        .with_rectangle("x", Rect::new(0, 0, 1, 1))
        .expect("add");
    let cleared = state.cleared();
    assert_eq!(cleared.mode, SessionMode::MultiItemBuild);
    assert!(cleared.rectangles.is_empty());
    assert_eq!((cleared.canvas_width, cleared.canvas_height), (0, 0));
}

#[test]
fn metadata_roundtrip_drops_pixel_handles() {
    let item = ingest_image("pix", DynamicImage::new_rgba8(4, 4)).expect("ingest");
    let state = SessionState::single_image(16, 16)
        .with_rectangle("r", Rect::new(0, 0, 4, 4))
        .expect("add")
        .with_pending(item);
    let meta = state.metadata();
    assert_eq!(meta.pending.len(), 1);

    let json = serde_json::to_string(&meta).expect("serialize");
    assert!(json.contains("\"mode\":\"multi-item-build\""));
    let back: SessionMetadata = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, meta);

    let restored = SessionState::from_metadata(back);
    assert_eq!(restored.rectangles, state.rectangles);
    assert!(restored.pending.is_empty());
}

#[test]
fn ingestion_reads_dimensions_without_decoding() {
    let item = ingest_bytes("photo", encoded(7, 3, ImageFormat::Jpeg)).expect("jpeg");
    assert_eq!((item.w, item.h), (7, 3));
    assert!(!item.source.is_decoded());

    let decoded = ingest_image("decoded", DynamicImage::new_rgb8(2, 5)).expect("decoded");
    assert_eq!((decoded.w, decoded.h), (2, 5));
    assert!(decoded.source.is_decoded());
}

#[test]
fn ingestion_rejects_garbage_and_empty_images() {
    assert!(matches!(
        ingest_bytes("junk", b"not an image".to_vec()),
        Err(SpriteSheetError::Image(_))
    ));
    assert!(matches!(
        ingest_image("empty", DynamicImage::new_rgba8(0, 0)),
        Err(SpriteSheetError::InvalidInput(_))
    ));
}
