use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shelf packing configuration.
/// Key notes:
///   - the row width is an area-based estimate `sqrt(total_area) * row_width_factor`
///     clamped to `[min_row_width, max_row_width]`; it only decides when a row wraps
///   - `padding` is inserted between neighbours and between rows, never around the sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Pixels between adjacent sprites and between rows.
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Lower bound of the estimated row width.
    #[serde(default = "default_min_row_width")]
    pub min_row_width: u32,
    /// Upper bound of the estimated row width. Advisory: a single oversized sprite still fits.
    #[serde(default = "default_max_row_width")]
    pub max_row_width: u32,
    /// Multiplier applied to `sqrt(total_area)`.
    #[serde(default = "default_row_width_factor")]
    pub row_width_factor: f64,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            min_row_width: default_min_row_width(),
            max_row_width: default_max_row_width(),
            row_width_factor: default_row_width_factor(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - a row width bound is zero
    /// - `min_row_width` exceeds `max_row_width`
    /// - `row_width_factor` is not a finite positive number
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpriteSheetError;

        if self.min_row_width == 0 || self.max_row_width == 0 {
            return Err(SpriteSheetError::InvalidConfig(format!(
                "row width bounds must be non-zero (min {}, max {})",
                self.min_row_width, self.max_row_width
            )));
        }
        if self.min_row_width > self.max_row_width {
            return Err(SpriteSheetError::InvalidConfig(format!(
                "min_row_width ({}) exceeds max_row_width ({})",
                self.min_row_width, self.max_row_width
            )));
        }
        if !self.row_width_factor.is_finite() || self.row_width_factor <= 0.0 {
            return Err(SpriteSheetError::InvalidConfig(format!(
                "row_width_factor must be a finite positive number, got {}",
                self.row_width_factor
            )));
        }
        Ok(())
    }

    /// Target row width for a set of sprites with the given total area.
    pub fn target_width(&self, total_area: u64) -> u32 {
        let estimate = (total_area as f64).sqrt() * self.row_width_factor;
        let lower = estimate.max(self.min_row_width as f64);
        lower.min(self.max_row_width as f64) as u32
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

fn default_padding() -> u32 {
    2
}
fn default_min_row_width() -> u32 {
    512
}
fn default_max_row_width() -> u32 {
    4096
}
fn default_row_width_factor() -> f64 {
    1.5
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn row_width_bounds(mut self, min: u32, max: u32) -> Self {
        self.cfg.min_row_width = min;
        self.cfg.max_row_width = max;
        self
    }
    pub fn row_width_factor(mut self, v: f64) -> Self {
        self.cfg.row_width_factor = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

/// Composite drawing options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Draw red outlines around every sprite (debug).
    #[serde(default)]
    pub outlines: bool,
}

/// Deferred save policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before the session is written.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    2000
}

/// Stylesheet generation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenOptions {
    /// URL of the sheet image as referenced from the stylesheet.
    #[serde(default = "default_image_url")]
    pub image_url: String,
    /// Base class name; sprite classes are `<prefix>-<name>`.
    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            image_url: default_image_url(),
            class_prefix: default_class_prefix(),
        }
    }
}

fn default_image_url() -> String {
    "sprite.png".into()
}
fn default_class_prefix() -> String {
    "sprite".into()
}
