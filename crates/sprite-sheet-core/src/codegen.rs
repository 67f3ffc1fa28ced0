//! Stylesheet and metadata generation for a packed sheet.
//!
//! Every format is a pure function of the rectangle list and the canvas size.
//! Rectangle names are emitted as-is: they are sanitized when a rectangle is
//! created or renamed, not here.

use crate::config::CodegenOptions;
use crate::error::{Result, SpriteSheetError};
use crate::model::Rectangle;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::str::FromStr;

/// Generated output kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain CSS: one base class plus one class per sprite.
    Css,
    /// SCSS: a sprite map with a lookup mixin.
    Scss,
    /// JSON: `{ name: { x, y, width, height } }`.
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Css, OutputFormat::Scss, OutputFormat::Json];

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Css => "css",
            OutputFormat::Scss => "scss",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SpriteSheetError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "css" => Ok(Self::Css),
            "scss" => Ok(Self::Scss),
            "json" => Ok(Self::Json),
            _ => Err(SpriteSheetError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Generates `format` output for the given rectangles and canvas size.
pub fn generate(
    rects: &[Rectangle],
    canvas_width: u32,
    canvas_height: u32,
    format: OutputFormat,
    opts: &CodegenOptions,
) -> String {
    match format {
        OutputFormat::Css => to_css(rects, canvas_width, canvas_height, opts),
        OutputFormat::Scss => to_scss(rects, canvas_width, canvas_height, opts),
        OutputFormat::Json => to_json_string(rects),
    }
}

/// Same as `generate`, with the format given by name. Unknown names are rejected.
pub fn generate_named(
    rects: &[Rectangle],
    canvas_width: u32,
    canvas_height: u32,
    format: &str,
    opts: &CodegenOptions,
) -> Result<String> {
    let format: OutputFormat = format.parse()?;
    Ok(generate(rects, canvas_width, canvas_height, format, opts))
}

/// CSS offsets are negated; zero is printed without a sign.
fn neg_px(v: u32) -> String {
    if v == 0 {
        "0px".into()
    } else {
        format!("-{v}px")
    }
}

fn to_css(rects: &[Rectangle], canvas_width: u32, canvas_height: u32, opts: &CodegenOptions) -> String {
    if rects.is_empty() {
        return "/* No sprites defined yet. */\n".into();
    }
    let prefix = &opts.class_prefix;
    let mut s = String::new();
    s.push_str(&format!(
        ".{prefix} {{\n  background-image: url('{}');\n  background-repeat: no-repeat;\n  background-size: {canvas_width}px {canvas_height}px;\n  display: inline-block;\n}}\n",
        opts.image_url
    ));
    for r in rects {
        s.push_str(&format!(
            "\n.{prefix}-{} {{\n  width: {}px;\n  height: {}px;\n  background-position: {} {};\n}}\n",
            r.name,
            r.w,
            r.h,
            neg_px(r.x),
            neg_px(r.y),
        ));
    }
    s
}

fn to_scss(rects: &[Rectangle], canvas_width: u32, canvas_height: u32, opts: &CodegenOptions) -> String {
    if rects.is_empty() {
        return "// No sprites defined yet.\n".into();
    }
    let prefix = &opts.class_prefix;
    let mut s = String::new();
    s.push_str(&format!(
        "${prefix}-image: '{}';\n${prefix}-width: {canvas_width}px;\n${prefix}-height: {canvas_height}px;\n\n${prefix}s: (\n",
        opts.image_url
    ));
    for r in rects {
        s.push_str(&format!(
            "  '{}': ({}, {}, {}px, {}px),\n",
            r.name,
            neg_px(r.x),
            neg_px(r.y),
            r.w,
            r.h
        ));
    }
    s.push_str(");\n\n");
    s.push_str(&format!(
        "@mixin {prefix}($name) {{\n  ${prefix}: map-get(${prefix}s, $name);\n  @if not ${prefix} {{\n    @error \"Unknown sprite: #{{$name}}\";\n  }}\n  display: inline-block;\n  width: nth(${prefix}, 3);\n  height: nth(${prefix}, 4);\n  background-image: url(${prefix}-image);\n  background-repeat: no-repeat;\n  background-position: nth(${prefix}, 1) nth(${prefix}, 2);\n  background-size: ${prefix}-width ${prefix}-height;\n}}\n"
    ));
    s.push_str(&format!(
        "\n@mixin {prefix}-highlight($color: #ff3e00) {{\n  outline: 2px solid $color;\n  outline-offset: -2px;\n  box-shadow: 0 0 0 4px rgba($color, 0.25);\n}}\n"
    ));
    s
}

/// Name-keyed JSON value in rectangle order.
/// Shape: `{ name: { x, y, width, height } }`.
pub fn to_json(rects: &[Rectangle]) -> Value {
    let mut frames = Map::new();
    for r in rects {
        frames.insert(
            r.name.clone(),
            json!({"x": r.x, "y": r.y, "width": r.w, "height": r.h}),
        );
    }
    Value::Object(frames)
}

fn to_json_string(rects: &[Rectangle]) -> String {
    // Serializing a `Value` built from plain integers cannot fail.
    serde_json::to_string_pretty(&to_json(rects)).unwrap_or_else(|_| "{}".into())
}
