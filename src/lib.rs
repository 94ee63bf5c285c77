//! # exif-frame
//!
//! Render an information footer onto a copy of a photo: camera model, lens,
//! focal length, aperture, shutter speed, ISO, capture date, and the maker's
//! logo, all read from the photo's embedded EXIF metadata.
//!
//! ## Quick Start
//!
//! The pipeline module handles the full read → extract → compose flow:
//!
//! ```rust,no_run
//! use exif_frame::config::Config;
//! use exif_frame::frame::FrameComposer;
//! use exif_frame::pipeline::{frame_file, output_path, write_output};
//! use exif_frame::render::SoftwareRasterizer;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load config from file (logo directory, font, output naming)
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     let rasterizer = SoftwareRasterizer::from_font_path(config.assets.font_path.as_deref())?;
//!     let composer = FrameComposer::new(rasterizer, &config);
//!
//!     let input = Path::new("IMG_0001.jpg");
//!     let outcome = frame_file(input, &composer).await?;
//!     match outcome.framed {
//!         Some(framed) => write_output(&output_path(input, &config.output), &framed).await?,
//!         None => eprintln!("Rendering failed for {}", input.display()),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The extractor and the formatting helpers are usable on their own:
//!
//! ```rust
//! use exif_frame::exif::TagMap;
//! use exif_frame::frame::{FooterGeometry, FooterText, format_f_number, DEFAULT_PLACEHOLDER};
//!
//! let tags: TagMap = [("Model", "EOS R5"), ("FNumber", "f/2.80")].into_iter().collect();
//! let text = FooterText::from_tags(&tags, DEFAULT_PLACEHOLDER);
//! assert_eq!(text.model, "EOS R5");
//! assert_eq!(format_f_number("f/2.0"), "f/2");
//!
//! let geometry = FooterGeometry::new(4000, 3000);
//! assert_eq!(geometry.footer_height.round(), 480.0);
//! ```
//!
//! ## Footer Geometry
//!
//! | quantity | landscape | portrait |
//! |----------|-----------|----------|
//! | footer height | height × 0.16 | height × 0.10 |
//! | primary font / line | footer × 0.20 / 0.30 | footer × 0.18 / 0.26 |
//! | secondary font / line | footer × 0.15 / 0.20 | footer × 0.14 / 0.18 |
//! | divider opacity | 0.2 | 0.4 |
//!
//! ## Modules
//!
//! - [`config`]: Configuration types and loading/saving
//! - [`error`]: Library error type
//! - [`exif`]: EXIF tag extraction
//! - [`frame`]: Footer formatting, geometry, logos, and the composer
//! - [`pipeline`]: File-level read → extract → compose → write helpers
//! - [`render`]: Visual tree, layout, render stage, and rasterizers

pub mod config;
pub mod error;
pub mod exif;
pub mod frame;
pub mod pipeline;
pub mod render;

#[cfg(test)]
mod test_support;

pub use error::FrameError;
