//! Compact, URL-embeddable layout sharing.
//!
//! Wire format: `v1|name:x,y,w,h;name:x,y,w,h`. Only names and geometry travel;
//! decoded rectangles get fresh ids. Decoded names are normalized with
//! `sanitize_name`, so a name such as `a.b` comes back as `a-b`.

use crate::model::{Rect, Rectangle};
use crate::session::sanitize_name;
use tracing::debug;

/// Version tag every encoded layout starts with.
pub const VERSION_PREFIX: &str = "v1|";

const RESERVED: [char; 4] = [':', ';', ',', '|'];

/// One record `decode` skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Position of the record among the `;`-separated records.
    pub index: usize,
    pub raw: String,
    pub reason: &'static str,
}

/// Encodes rectangles as `v1|name:x,y,w,h;...`. Reserved characters in names become `-`.
pub fn encode(rects: &[Rectangle]) -> String {
    let records: Vec<String> = rects
        .iter()
        .map(|r| {
            let name: String = r
                .name
                .chars()
                .map(|c| if RESERVED.contains(&c) { '-' } else { c })
                .collect();
            format!("{}:{},{},{},{}", name, r.x, r.y, r.w, r.h)
        })
        .collect();
    format!("{VERSION_PREFIX}{}", records.join(";"))
}

/// Decodes an encoded layout. Never fails: input without the version prefix yields
/// nothing and malformed records are skipped one by one.
pub fn decode(text: &str) -> Vec<Rectangle> {
    let (rects, skipped) = decode_with_report(text);
    for bad in &skipped {
        debug!(index = bad.index, raw = %bad.raw, reason = bad.reason, "skipped layout record");
    }
    rects
}

/// Like `decode`, also returning the records that were skipped.
pub fn decode_with_report(text: &str) -> (Vec<Rectangle>, Vec<MalformedRecord>) {
    let Some(body) = text.strip_prefix(VERSION_PREFIX) else {
        return (Vec::new(), Vec::new());
    };
    let mut rects = Vec::new();
    let mut skipped = Vec::new();
    for (index, raw) in body.split(';').enumerate() {
        if raw.is_empty() {
            continue;
        }
        match parse_record(raw) {
            Ok(r) => rects.push(r),
            Err(reason) => skipped.push(MalformedRecord {
                index,
                raw: raw.to_string(),
                reason,
            }),
        }
    }
    (rects, skipped)
}

/// `#`-prefixed form for URL fragments.
pub fn to_fragment(rects: &[Rectangle]) -> String {
    format!("#{}", encode(rects))
}

/// Accepts a fragment with or without its leading `#`.
pub fn from_fragment(fragment: &str) -> Vec<Rectangle> {
    decode(fragment.strip_prefix('#').unwrap_or(fragment))
}

fn parse_record(raw: &str) -> Result<Rectangle, &'static str> {
    let (name, coords) = raw.split_once(':').ok_or("missing coordinates")?;
    if name.is_empty() {
        return Err("missing name");
    }
    if coords.is_empty() {
        return Err("missing coordinates");
    }
    let fields: Vec<&str> = coords.split(',').collect();
    let [x, y, w, h] = fields.as_slice() else {
        return Err("expected four coordinates");
    };
    let parse = |v: &str| v.parse::<u32>().map_err(|_| "coordinate is not a number");
    let rect = Rect::new(parse(*x)?, parse(*y)?, parse(*w)?, parse(*h)?);
    if rect.w == 0 || rect.h == 0 {
        return Err("zero-sized rectangle");
    }
    Ok(Rectangle::new(sanitize_name(name), rect))
}
