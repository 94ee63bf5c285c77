use std::io::Cursor;
use std::path::Path;

use nom_exif::*;

use super::tags::{TagMap, tag_name};
use crate::error::{FrameError, Result};

const TAG_EXPOSURE_TIME: u16 = 0x829A;
const TAG_F_NUMBER: u16 = 0x829D;
const TAG_EXPOSURE_BIAS: u16 = 0x9204;
const TAG_FOCAL_LENGTH: u16 = 0x920A;

/// Read the file at `path` and parse its embedded metadata.
pub async fn load_tags(path: &Path) -> Result<TagMap> {
    let bytes = tokio::fs::read(path).await.map_err(|source| FrameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_tags(&bytes)
}

/// Parse embedded EXIF metadata from an in-memory image payload.
///
/// Fails with [`FrameError::Extraction`] when the payload is not a container
/// `nom-exif` understands or carries no EXIF block. There is no fallback to an
/// empty map: callers decide whether a photo without metadata is worth framing.
pub fn read_tags(bytes: &[u8]) -> Result<TagMap> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::seekable(Cursor::new(bytes)).map_err(extraction)?;
    let iter: ExifIter = parser.parse(ms).map_err(extraction)?;

    let mut tags = TagMap::new();
    for mut entry in iter {
        let code = entry.tag_code();
        let Some(name) = tag_name(code) else {
            continue;
        };
        let Some(value) = entry.take_value() else {
            log::debug!("Tag {name} (0x{code:04x}) has no readable value");
            continue;
        };
        if let Some(description) = describe(code, &value) {
            tags.insert_first(name, description);
        }
    }

    log::debug!("Extracted {} tag(s)", tags.len());
    Ok(tags)
}

fn extraction(err: impl std::fmt::Display) -> FrameError {
    FrameError::Extraction(err.to_string())
}

/// Render a tag value the way photo tools print it (`f/2.8`, `50 mm`, `1/200`).
fn describe(code: u16, value: &EntryValue) -> Option<String> {
    let description = match code {
        TAG_F_NUMBER => format!("f/{}", format_number(as_number(value)?)),
        TAG_FOCAL_LENGTH => format!("{} mm", format_number(as_number(value)?)),
        TAG_EXPOSURE_TIME => format_exposure(as_number(value)?),
        TAG_EXPOSURE_BIAS => format!("{} EV", format_number(as_number(value)?)),
        _ => as_text(value),
    };
    let description = description.trim().to_string();
    if description.is_empty() { None } else { Some(description) }
}

fn as_text(value: &EntryValue) -> String {
    match value {
        EntryValue::Text(s) => s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string(),
        EntryValue::URational(_) | EntryValue::IRational(_) => {
            as_number(value).map(format_number).unwrap_or_default()
        }
        other => {
            let rendered = other.to_string();
            normalize_date_time(&rendered).unwrap_or_else(|| first_item(&rendered).to_string())
        }
    }
}

fn as_number(value: &EntryValue) -> Option<f64> {
    match value {
        EntryValue::URational(r) if r.1 != 0 => Some(r.0 as f64 / r.1 as f64),
        EntryValue::IRational(r) if r.1 != 0 => Some(r.0 as f64 / r.1 as f64),
        EntryValue::U8(v) => Some(*v as f64),
        EntryValue::U16(v) => Some(*v as f64),
        EntryValue::U32(v) => Some(*v as f64),
        EntryValue::F32(v) => Some(*v as f64),
        EntryValue::F64(v) => Some(*v),
        EntryValue::Text(s) => s.trim().parse().ok(),
        other => first_item(&other.to_string()).parse().ok(),
    }
}

/// First element of a rendered array value such as `[100, 200]`.
fn first_item(rendered: &str) -> &str {
    rendered
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
}

/// Bring `2023-07-09T20:36:33+08:00` or `2023-07-09 20:36:33` back to the
/// EXIF `2023:07:09 20:36:33` form.
fn normalize_date_time(rendered: &str) -> Option<String> {
    let head = rendered.get(..19)?;
    let bytes = head.as_bytes();
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b'T' || *b == b' ',
        13 | 16 => *b == b':',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    Some(format!("{}:{}:{} {}", &head[0..4], &head[5..7], &head[8..10], &head[11..19]))
}

fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    format!("{rounded}")
}

fn format_exposure(seconds: f64) -> String {
    if seconds > 0.0 && seconds < 1.0 {
        format!("1/{}", (1.0 / seconds).round())
    } else {
        format_number(seconds)
    }
}
