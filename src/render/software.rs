use std::io::Cursor;
use std::path::Path;

use ab_glyph::{Font, FontArc, FontVec, PxScale, ScaleFont, point};
use anyhow::{Context, Result, anyhow};
use fontdb::{Database, Family, Query};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use super::layout::{Paint, Rect, TextMetrics, layout_tree};
use super::tree::{Color, VisualTree};
use super::{EncodedImage, Rasterizer};

const PREFERRED_FAMILIES: &[&str] = &["Helvetica Neue", "Inter", "Noto Sans", "DejaVu Sans"];

/// CPU rasterizer: paints the laid-out tree onto a white canvas and encodes
/// it as JPEG.
///
/// Painting and encoding run on tokio's blocking pool. Clones share the font.
#[derive(Clone)]
pub struct SoftwareRasterizer {
    font: FontArc,
}

impl SoftwareRasterizer {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    /// Load a TrueType/OpenType font file (first face of a collection).
    pub fn from_font_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font at {}", path.display()))?;
        let font = FontVec::try_from_vec(data)
            .with_context(|| format!("Failed to decode font at {}", path.display()))?;
        Ok(Self::new(FontArc::new(font)))
    }

    /// Use the first preferred sans-serif family installed on this machine,
    /// falling back to any face that decodes.
    pub fn with_system_font() -> Result<Self> {
        let mut db = Database::new();
        db.load_system_fonts();

        let preferred = PREFERRED_FAMILIES
            .iter()
            .map(|name| Family::Name(*name))
            .chain(std::iter::once(Family::SansSerif));
        for family in preferred {
            let query = Query { families: &[family], ..Default::default() };
            if let Some(font) = db.query(&query).and_then(|id| load_face(&db, id)) {
                return Ok(Self::new(font));
            }
        }

        db.faces()
            .find_map(|face| load_face(&db, face.id))
            .map(Self::new)
            .ok_or_else(|| anyhow!("No usable system font found"))
    }

    /// Font from `path` when given, otherwise a system font.
    pub fn from_font_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_font_file(p),
            None => Self::with_system_font(),
        }
    }

    /// Paint `tree` onto a fresh canvas.
    pub fn paint(&self, tree: &VisualTree) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(tree.width, tree.height, Rgba([255, 255, 255, 255]));
        for op in layout_tree(tree, self) {
            match op {
                Paint::Fill { rect, color } => fill_rect(&mut canvas, rect, color),
                Paint::Image { rect, image } => draw_image(&mut canvas, rect, image),
                Paint::Text { x, baseline, text, font_size, color } => {
                    self.draw_text(&mut canvas, text, x, baseline, font_size, color)
                }
            }
        }
        canvas
    }

    /// Font-size in CSS terms (em square) to an ab_glyph scale (ascent to descent).
    fn px_scale(&self, font_size: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(font_size * self.font.height_unscaled() / units_per_em)
    }

    fn draw_text(&self, canvas: &mut RgbaImage, text: &str, left: f32, baseline: f32, font_size: f32, color: Color) {
        let scaled = self.font.as_scaled(self.px_scale(font_size));
        let mut cursor_x = left;
        let mut previous = None;
        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                cursor_x += scaled.kern(prev, glyph_id);
            }
            let mut glyph = scaled.scaled_glyph(ch);
            glyph.position = point(cursor_x, baseline);
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                outline.draw(|x, y, coverage| {
                    blend_pixel(
                        canvas,
                        bounds.min.x as i64 + x as i64,
                        bounds.min.y as i64 + y as i64,
                        color,
                        coverage,
                    );
                });
            }
            cursor_x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }
    }

    fn encode(canvas: RgbaImage, quality: f32) -> Result<EncodedImage> {
        let (width, height) = canvas.dimensions();
        let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
        let mut out = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality))
            .encode_image(&rgb)
            .context("Failed to encode JPEG")?;
        Ok(EncodedImage { bytes: out.into_inner(), width, height })
    }
}

impl TextMetrics for SoftwareRasterizer {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let scaled = self.font.as_scaled(self.px_scale(font_size));
        let mut width = 0.0f32;
        let mut previous = None;
        for ch in text.chars().filter(|c| !c.is_control()) {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }
        width.max(0.0)
    }

    fn vertical_metrics(&self, font_size: f32) -> (f32, f32) {
        let scaled = self.font.as_scaled(self.px_scale(font_size));
        (scaled.ascent(), scaled.descent())
    }
}

#[async_trait::async_trait]
impl Rasterizer for SoftwareRasterizer {
    fn name(&self) -> &str {
        "software"
    }

    async fn rasterize(&self, tree: &VisualTree, quality: f32) -> Result<EncodedImage> {
        if tree.width == 0 || tree.height == 0 {
            anyhow::bail!("Cannot rasterize an empty {}x{} tree", tree.width, tree.height);
        }
        let painter = self.clone();
        // Image leaves are `Arc`s, so this copies node structure only.
        let tree = tree.clone();
        tokio::task::spawn_blocking(move || Self::encode(painter.paint(&tree), quality))
            .await
            .context("Rasterizer task failed")?
    }
}

fn load_face(db: &Database, id: fontdb::ID) -> Option<FontArc> {
    let font = db.with_face_data(id, |data, index| FontVec::try_from_vec_and_index(data.to_vec(), index))?;
    match font {
        Ok(font) => Some(FontArc::new(font)),
        Err(e) => {
            log::debug!("Skipping undecodable font face: {e}");
            None
        }
    }
}

/// `0.5` -> JPEG quality 50, kept within the encoder's `1..=100`.
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Color) {
    let x0 = rect.x.round().max(0.0) as i64;
    let y0 = rect.y.round().max(0.0) as i64;
    let x1 = (rect.x + rect.w).round().min(canvas.width() as f32) as i64;
    let y1 = (rect.y + rect.h).round().min(canvas.height() as f32) as i64;
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(canvas, x, y, color, 1.0);
        }
    }
}

fn draw_image(canvas: &mut RgbaImage, rect: Rect, image: &RgbaImage) {
    let w = rect.w.round().max(0.0) as u32;
    let h = rect.h.round().max(0.0) as u32;
    if w == 0 || h == 0 {
        return;
    }
    let resized;
    let source = if image.dimensions() == (w, h) {
        image
    } else {
        resized = imageops::resize(image, w, h, FilterType::Lanczos3);
        &resized
    };

    let left = rect.x.round() as i64;
    let top = rect.y.round() as i64;
    if source.pixels().all(|px| px[3] == u8::MAX) {
        imageops::replace(canvas, source, left, top);
        return;
    }
    for (x, y, px) in source.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let color = Color { r, g, b, a: a as f32 / 255.0 };
        blend_pixel(canvas, left + x as i64, top + y as i64, color, 1.0);
    }
}

fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Color, coverage: f32) {
    if coverage <= 0.0 || x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (color.a * coverage).clamp(0.0, 1.0);
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let mix = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
    *dst = Rgba([mix(color.r, dst[0]), mix(color.g, dst[1]), mix(color.b, dst[2]), 255]);
}
