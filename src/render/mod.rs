//! Visual tree, layout, and rasterization.
//!
//! The composer builds a [`VisualTree`], mounts it on a [`Stage`] and hands it
//! to a [`Rasterizer`]. [`SoftwareRasterizer`] is the bundled implementation;
//! tests plug in their own.

mod layout;
mod software;
mod stage;
mod tree;

pub use layout::{Paint, Rect, TextMetrics, layout_tree};
pub use software::SoftwareRasterizer;
pub use stage::{Mounted, Stage};
pub use tree::{Axis, Color, Container, DividerLeaf, ImageLeaf, Node, TextLeaf, VisualTree};

use anyhow::Result;
use base64::Engine;

/// An encoded composite image held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn mime(&self) -> &'static str {
        "image/jpeg"
    }

    /// `data:image/jpeg;base64,...`
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.mime())
    }
}

/// Turns a mounted visual tree into an encoded image.
///
/// Implement this to render through something other than the bundled
/// software painter.
///
/// # Example
///
/// ```rust,no_run
/// use exif_frame::render::{Rasterizer, SoftwareRasterizer};
///
/// let rasterizer = SoftwareRasterizer::with_system_font()?;
/// println!("Rendering with {}", rasterizer.name());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[async_trait::async_trait]
pub trait Rasterizer: Send + Sync {
    /// The display name of this rasterizer.
    fn name(&self) -> &str;
    /// Rasterize `tree` and encode it. `quality` is in `0.0..=1.0`.
    async fn rasterize(&self, tree: &VisualTree, quality: f32) -> Result<EncodedImage>;
}
