//! Single-slot persistence of the current session.
//!
//! Two logical stores live under one fixed session key: `metadata` (the session
//! without pixel handles) and `images` (the composite PNG). Every save replaces
//! both; there is no history.

use crate::error::{Result, SpriteSheetError};
use crate::model::RasterBlob;
use crate::session::{SessionMetadata, sanitize_name};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

/// Session key used when none is given.
pub const DEFAULT_SESSION_KEY: &str = "current";
/// The only metadata schema revision this crate reads or writes.
pub const SCHEMA_VERSION: u32 = 1;

/// What a store hands back on load.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRecord {
    pub metadata: SessionMetadata,
    pub raster: Option<RasterBlob>,
    pub saved_at: DateTime<Utc>,
}

/// Durable single-slot storage for a session.
///
/// Implementations must make `clear` all-or-nothing from the caller's point of view
/// and never pair metadata with a raster from a different save.
pub trait SessionStore: Send + Sync {
    /// Replaces the stored record. `None` leaves no raster behind.
    fn save(&self, metadata: &SessionMetadata, raster: Option<&RasterBlob>) -> Result<()>;
    fn load(&self) -> Result<Option<PersistedRecord>>;
    fn clear(&self) -> Result<()>;
}

fn failure(op: &'static str) -> impl Fn(io::Error) -> SpriteSheetError {
    move |e| SpriteSheetError::Persistence {
        op,
        reason: e.to_string(),
    }
}

// ---------------- In-memory ----------------

/// Process-local store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<PersistedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_slot<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Option<PersistedRecord>) -> T,
    ) -> Result<T> {
        let mut guard = self.slot.lock().map_err(|_| SpriteSheetError::Persistence {
            op,
            reason: "store lock poisoned".into(),
        })?;
        Ok(f(&mut guard))
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, metadata: &SessionMetadata, raster: Option<&RasterBlob>) -> Result<()> {
        let record = PersistedRecord {
            metadata: metadata.clone(),
            raster: raster.cloned(),
            saved_at: Utc::now(),
        };
        self.with_slot("save", |slot| *slot = Some(record))
    }

    fn load(&self) -> Result<Option<PersistedRecord>> {
        self.with_slot("load", |slot| slot.clone())
    }

    fn clear(&self) -> Result<()> {
        self.with_slot("clear", |slot| *slot = None)
    }
}

// ---------------- Filesystem ----------------

#[derive(Debug, Serialize, Deserialize)]
struct MetadataEnvelope {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    #[serde(default)]
    image: Option<StoredImage>,
    session: SessionMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredImage {
    file: String,
    width: u32,
    height: u32,
}

/// Directory-backed store.
///
/// Layout: `metadata/<key>.json` and `images/<key>-<generation>.png`. The image is
/// written first under a fresh generation; renaming the metadata file into place
/// commits the save. Clearing removes the metadata first, so an interrupted clear
/// still reads as absent.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    key: String,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `root` with the default key.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_key(root, DEFAULT_SESSION_KEY)
    }

    pub fn open_with_key(root: impl Into<PathBuf>, key: &str) -> Result<Self> {
        let store = Self {
            root: root.into(),
            key: sanitize_name(key),
        };
        fs::create_dir_all(store.metadata_dir()).map_err(failure("open"))?;
        fs::create_dir_all(store.images_dir()).map_err(failure("open"))?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn metadata_dir(&self) -> PathBuf {
        self.root.join("metadata")
    }

    fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    fn metadata_path(&self) -> PathBuf {
        self.metadata_dir().join(format!("{}.json", self.key))
    }

    fn image_file(&self, generation: Uuid) -> String {
        format!("{}-{}.png", self.key, generation.simple())
    }

    /// True for `<key>-<32 hex>.png` only. Keys may contain `-` themselves.
    fn owns_image(&self, name: &str) -> bool {
        name.strip_prefix(self.key.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|rest| rest.strip_suffix(".png"))
            .is_some_and(|g| g.len() == 32 && g.bytes().all(|b| b.is_ascii_hexdigit()))
    }

    /// Removes every image generation of this key except `keep`.
    fn prune_images(&self, keep: Option<&str>) {
        let entries = match fs::read_dir(self.images_dir()) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "could not list stored images");
                return;
            }
        };
        for entry in entries.filter_map(|e| e.ok()) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.owns_image(&name) || Some(name.as_str()) == keep {
                continue;
            }
            if let Err(e) = fs::remove_file(entry.path()) {
                warn!(file = %name, error = %e, "could not remove stale image");
            } else {
                debug!(file = %name, "removed stale image");
            }
        }
    }
}

impl SessionStore for FileStore {
    fn save(&self, metadata: &SessionMetadata, raster: Option<&RasterBlob>) -> Result<()> {
        let image = match raster {
            Some(blob) => {
                let file = self.image_file(Uuid::new_v4());
                fs::write(self.images_dir().join(&file), &blob.png[..]).map_err(failure("save"))?;
                Some(StoredImage {
                    file,
                    width: blob.width,
                    height: blob.height,
                })
            }
            None => None,
        };
        let envelope = MetadataEnvelope {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            image,
            session: metadata.clone(),
        };
        let json = serde_json::to_vec_pretty(&envelope).map_err(|e| SpriteSheetError::Persistence {
            op: "save",
            reason: e.to_string(),
        })?;
        let path = self.metadata_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(failure("save"))?;
        fs::rename(&tmp, &path).map_err(failure("save"))?;
        self.prune_images(envelope.image.as_ref().map(|i| i.file.as_str()));
        debug!(path = %path.display(), "session saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedRecord>> {
        let bytes = match fs::read(self.metadata_path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(failure("load")(e)),
        };
        let envelope: MetadataEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| SpriteSheetError::Persistence {
                op: "load",
                reason: e.to_string(),
            })?;
        if envelope.schema_version != SCHEMA_VERSION {
            warn!(
                found = envelope.schema_version,
                expected = SCHEMA_VERSION,
                "ignoring session with unknown schema"
            );
            return Ok(None);
        }
        let raster = match envelope.image {
            Some(img) => {
                let png = fs::read(self.images_dir().join(&img.file)).map_err(failure("load"))?;
                Some(RasterBlob {
                    width: img.width,
                    height: img.height,
                    png: Arc::from(png),
                })
            }
            None => None,
        };
        Ok(Some(PersistedRecord {
            metadata: envelope.session,
            raster,
            saved_at: envelope.saved_at,
        }))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(self.metadata_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(failure("clear")(e)),
        }
        self.prune_images(None);
        Ok(())
    }
}
