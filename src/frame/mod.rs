//! Footer composition: text formatting, proportional geometry, logo lookup,
//! and the [`FrameComposer`] that ties them to a rasterizer.

mod composer;
mod footer;
mod format;
mod geometry;
mod logo;

pub use composer::FrameComposer;
pub use footer::build_tree;
pub use format::{
    DEFAULT_PLACEHOLDER, FooterText, exposure_summary, format_date_time, format_f_number,
    format_focal_length,
};
pub use geometry::{FooterGeometry, Orientation};
pub use logo::{LOGOS, LogoAsset, load_logo, resolve_logo};
