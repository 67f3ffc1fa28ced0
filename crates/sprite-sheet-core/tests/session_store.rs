use sprite_sheet_core::compositing::encode_png;
use sprite_sheet_core::prelude::*;
use sprite_sheet_core::session::PendingEntry;
use sprite_sheet_core::store::SCHEMA_VERSION;
use std::fs;
use std::sync::Arc;

fn sample_metadata() -> SessionMetadata {
    let state = SessionState::single_image(64, 32)
        .with_rectangle("play", Rect::new(0, 0, 32, 32))
        .and_then(|s| s.with_rectangle("stop", Rect::new(34, 0, 16, 16)))
        .expect("rectangles");
    state.metadata()
}

fn sample_raster() -> RasterBlob {
    let png = encode_png(&image::RgbaImage::from_pixel(
        64,
        32,
        image::Rgba([9, 8, 7, 255]),
    ))
    .expect("encode");
    RasterBlob {
        width: 64,
        height: 32,
        png: Arc::from(png),
    }
}

fn image_files(root: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root.join("images"))
        .expect("images dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn file_store_save_then_load_is_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    let metadata = sample_metadata();
    let raster = sample_raster();

    store.save(&metadata, Some(&raster)).expect("save");
    let record = store.load().expect("load").expect("present");
    assert_eq!(record.metadata, metadata);
    assert_eq!(record.raster.as_ref(), Some(&raster));
    assert_eq!(&record.raster.expect("raster").png[..], &raster.png[..]);
}

#[test]
fn file_store_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    assert!(store.load().expect("load").is_none());
    // clearing an empty store is fine
    store.clear().expect("clear");
}

#[test]
fn file_store_overwrites_single_slot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    store.save(&sample_metadata(), Some(&sample_raster())).expect("first");

    let second = SessionState::multi_item().metadata();
    store.save(&second, None).expect("second");
    let record = store.load().expect("load").expect("present");
    assert_eq!(record.metadata, second);
    assert!(record.raster.is_none());
    assert!(image_files(dir.path()).is_empty());
}

#[test]
fn repeated_saves_keep_one_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    let metadata = sample_metadata();
    let raster = sample_raster();
    for _ in 0..3 {
        store.save(&metadata, Some(&raster)).expect("save");
    }
    assert_eq!(image_files(dir.path()).len(), 1);
    let record = store.load().expect("load").expect("present");
    assert_eq!(record.metadata, metadata);
    assert_eq!(record.raster, Some(raster));
}

#[test]
fn clear_removes_both_stores() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    store.save(&sample_metadata(), Some(&sample_raster())).expect("save");
    store.clear().expect("clear");
    assert!(store.load().expect("load").is_none());
    assert!(image_files(dir.path()).is_empty());
    assert!(!dir.path().join("metadata").join("current.json").exists());
}

#[test]
fn interrupted_clear_reads_as_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    store.save(&sample_metadata(), Some(&sample_raster())).expect("save");
    // A clear that stopped right after its commit point leaves an orphan image behind.
    fs::remove_file(dir.path().join("metadata").join("current.json")).expect("remove");
    assert_eq!(image_files(dir.path()).len(), 1);
    assert!(store.load().expect("load").is_none());
}

#[test]
fn stores_with_different_keys_are_independent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = FileStore::open_with_key(dir.path(), "alpha").expect("open a");
    let b = FileStore::open_with_key(dir.path(), "beta").expect("open b");
    a.save(&sample_metadata(), Some(&sample_raster())).expect("save a");
    b.save(&SessionState::multi_item().metadata(), Some(&sample_raster()))
        .expect("save b");
    a.clear().expect("clear a");
    assert!(a.load().expect("load a").is_none());
    let record = b.load().expect("load b").expect("b present");
    assert!(record.raster.is_some());
}

#[test]
fn foreign_schema_version_reads_as_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    store.save(&sample_metadata(), None).expect("save");
    let path = dir.path().join("metadata").join("current.json");
    let mut doc: serde_json::Value =
        serde_json::from_slice(&fs::read(&path).expect("read")).expect("json");
    assert_eq!(doc["schema_version"], SCHEMA_VERSION);
    doc["schema_version"] = serde_json::json!(SCHEMA_VERSION + 1);
    fs::write(&path, serde_json::to_vec(&doc).expect("encode")).expect("write");
    assert!(store.load().expect("load").is_none());
}

#[test]
fn missing_referenced_image_is_a_persistence_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    store.save(&sample_metadata(), Some(&sample_raster())).expect("save");
    for name in image_files(dir.path()) {
        fs::remove_file(dir.path().join("images").join(name)).expect("remove");
    }
    let err = store.load().expect_err("dangling image");
    assert!(matches!(
        err,
        sprite_sheet_core::SpriteSheetError::Persistence { op: "load", .. }
    ));
}

#[test]
fn metadata_never_contains_pixels() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path()).expect("open");
    let item = ingest_bytes("pending", sample_raster().png.to_vec()).expect("ingest");
    let state = SessionState::multi_item().with_pending(item.clone());
    store.save(&state.metadata(), None).expect("save");

    let text = fs::read_to_string(dir.path().join("metadata").join("current.json")).expect("read");
    let doc: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(
        doc["session"]["pending"][0],
        serde_json::json!({"id": item.id, "name": "pending", "w": 64, "h": 32})
    );

    let record = store.load().expect("load").expect("present");
    assert_eq!(
        record.metadata.pending,
        vec![PendingEntry {
            id: item.id,
            name: "pending".into(),
            w: 64,
            h: 32
        }]
    );
}

#[test]
fn memory_store_roundtrip_and_clear() {
    let store = MemoryStore::new();
    assert!(store.load().expect("load").is_none());
    let metadata = sample_metadata();
    let raster = sample_raster();
    store.save(&metadata, Some(&raster)).expect("save");
    store.save(&metadata, Some(&raster)).expect("idempotent");
    let record = store.load().expect("load").expect("present");
    assert_eq!(record.metadata, metadata);
    assert_eq!(record.raster, Some(raster));
    store.clear().expect("clear");
    assert!(store.load().expect("load").is_none());
}

#[test]
fn stores_work_behind_trait_objects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stores: Vec<Arc<dyn SessionStore>> = vec![
        Arc::new(MemoryStore::new()),
        Arc::new(FileStore::open(dir.path()).expect("open")),
    ];
    for store in stores {
        store.save(&sample_metadata(), None).expect("save");
        assert!(store.load().expect("load").is_some());
    }
}

#[test]
fn key_that_prefixes_another_key_leaves_its_images_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let short = FileStore::open_with_key(dir.path(), "a").expect("open a");
    let long = FileStore::open_with_key(dir.path(), "a-b").expect("open a-b");
    long.save(&sample_metadata(), Some(&sample_raster()))
        .expect("save a-b");
    short
        .save(&sample_metadata(), Some(&sample_raster()))
        .expect("save a");
    assert_eq!(image_files(dir.path()).len(), 2);

    let record = long.load().expect("load a-b").expect("a-b present");
    assert_eq!(record.raster, Some(sample_raster()));

    short.clear().expect("clear a");
    assert!(short.load().expect("load a").is_none());
    assert!(long.load().expect("load a-b").is_some());
    assert_eq!(image_files(dir.path()).len(), 1);
}
