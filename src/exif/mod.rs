//! EXIF metadata extraction.
//!
//! - [`read_tags`] parses an in-memory payload into a [`TagMap`]
//! - [`load_tags`] does the same for a file on disk
//!
//! Descriptions are human-readable (`f/2.8`, `50 mm`, `1/200`) rather than raw
//! rationals, since the frame footer prints them almost verbatim.

mod reader;
mod tags;

pub use reader::{load_tags, read_tags};
pub use tags::{TagMap, tag_name};
