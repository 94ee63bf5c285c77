use std::sync::Arc;

use image::RgbaImage;

use super::format::FooterText;
use super::geometry::FooterGeometry;
use crate::render::{Axis, Color, Container, DividerLeaf, ImageLeaf, Node, TextLeaf, VisualTree};

const PRIMARY_TEXT: Color = Color::from_rgb(0x212121);
const SECONDARY_TEXT: Color = Color::from_rgb(0x7F7F7F);
const DIVIDER: Color = Color::from_rgb(0x000000);

/// Assemble the photo and its footer band.
///
/// ```text
/// frame (column)
/// ├── photo
/// └── footer (row, grows)
///     ├── footer-left (column, grows): model, lens
///     ├── logo            only when one was loaded
///     ├── divider         only when the make is non-empty
///     └── footer-right (column): exposure, date/time
/// ```
pub fn build_tree(
    photo: Arc<RgbaImage>,
    text: &FooterText,
    geometry: &FooterGeometry,
    logo: Option<Arc<RgbaImage>>,
) -> VisualTree {
    let (width, height) = photo.dimensions();
    let g = geometry;

    let primary = |s: &str| {
        Node::Text(TextLeaf {
            text: s.to_string(),
            font_size: g.primary_font_size,
            line_height: g.primary_line_height,
            color: PRIMARY_TEXT,
        })
    };
    let secondary = |s: &str| {
        Node::Text(TextLeaf {
            text: s.to_string(),
            font_size: g.secondary_font_size,
            line_height: g.secondary_line_height,
            color: SECONDARY_TEXT,
        })
    };

    let mut left = Container::new("footer-left", Axis::Column)
        .child(primary(&text.model))
        .child(secondary(&text.lens_model));
    left.grow = true;
    left.padding_right = g.padding;

    let right = Container::new("footer-right", Axis::Column)
        .child(primary(&text.exposure))
        .child(secondary(&text.date_time));

    let mut footer = Container::new("footer", Axis::Row).child(Node::Container(left));
    footer.grow = true;
    footer.padding_x = g.padding;

    if let Some(logo) = logo {
        footer.children.push(Node::Image(ImageLeaf { image: logo, height: Some(g.logo_height) }));
    }
    if !text.make.is_empty() {
        footer.children.push(Node::Divider(DividerLeaf {
            width: g.divider_width(),
            height: g.divider_height,
            margin_x: g.divider_margin,
            color: DIVIDER.with_alpha(g.divider_opacity),
        }));
    }
    footer.children.push(Node::Container(right));

    let total_height = height as f32 + g.footer_height;
    let mut frame = Container::new("frame", Axis::Column)
        .child(Node::Image(ImageLeaf { image: photo, height: None }))
        .child(Node::Container(footer));
    frame.width = Some(width as f32);
    frame.height = Some(total_height);
    frame.background = Some(Color::WHITE);

    VisualTree {
        root: Node::Container(frame),
        width,
        height: total_height.round() as u32,
    }
}
