//! Core library for building CSS sprite sheets.
//!
//! - Packing: greedy shelf placement into one sheet (`pack`, `pack_items`, `pack_layout`)
//! - Rendering: `CompositeRenderer` draws packed sprites into one PNG and explodes a sheet back into sprites
//! - Output: CSS / SCSS / JSON code generation and a compact URL fragment format
//! - State: `SessionState` values, single-slot persistence (`SessionStore`) and a debounced `Autosave`
//!
//! Quick example:
//! ```ignore
//! use sprite_sheet_core::prelude::*;
//! # async fn run() -> sprite_sheet_core::Result<()> {
//! let a = ingest_bytes("play", std::fs::read("play.png")?)?;
//! let b = ingest_bytes("stop", std::fs::read("stop.png")?)?;
//! let sheet = pack_items(vec![a, b], &PackerConfig::default())?;
//! let raster = CompositeRenderer::default()
//!     .draw(&sheet.placed, sheet.layout.canvas_width, sheet.layout.canvas_height)
//!     .await?;
//! let css = generate(
//!     &sheet.layout.rectangles,
//!     sheet.layout.canvas_width,
//!     sheet.layout.canvas_height,
//!     OutputFormat::Css,
//!     &CodegenOptions::default(),
//! );
//! println!("{} bytes of png, {} bytes of css", raster.png.len(), css.len());
//! # Ok(()) }
//! ```

pub mod autosave;
pub mod codegen;
pub mod compositing;
pub mod config;
pub mod error;
pub mod ingest;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod store;
pub mod url_state;

pub use autosave::*;
pub use codegen::*;
pub use config::*;
pub use error::*;
pub use ingest::*;
pub use model::*;
pub use pipeline::*;
pub use render::*;
pub use session::*;
pub use store::*;

/// Convenience prelude for common types and functions.
/// Importing `sprite_sheet_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::autosave::{Autosave, SaveStatus, SessionSnapshot};
    pub use crate::codegen::{OutputFormat, generate, generate_named};
    pub use crate::config::{
        AutosaveConfig, CodegenOptions, PackerConfig, PackerConfigBuilder, RenderConfig,
    };
    pub use crate::ingest::{ingest_bytes, ingest_image};
    pub use crate::model::{
        LayoutResult, LayoutStats, PixelSource, PositionedItem, RasterBlob, Rect, Rectangle,
        SpriteId, UnpositionedItem,
    };
    pub use crate::pipeline::{PackedSheet, pack, pack_items, pack_layout};
    pub use crate::render::{CompositeRenderer, RasterSlot};
    pub use crate::session::{SessionMetadata, SessionMode, SessionState, sanitize_name};
    pub use crate::store::{FileStore, MemoryStore, PersistedRecord, SessionStore};
    pub use crate::url_state;
}
