use image::RgbaImage;

use super::tree::{Axis, Color, Container, Node, TextLeaf, VisualTree};

/// Text measurement, supplied by whatever draws the glyphs.
pub trait TextMetrics {
    /// Advance width of `text` at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f32) -> f32;
    /// Ascent and (negative) descent at `font_size` pixels.
    fn vertical_metrics(&self, font_size: f32) -> (f32, f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// A positioned drawing instruction, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint<'a> {
    Fill { rect: Rect, color: Color },
    Image { rect: Rect, image: &'a RgbaImage },
    Text { x: f32, baseline: f32, text: &'a str, font_size: f32, color: Color },
}

/// Resolve the tree into absolute paint operations.
pub fn layout_tree<'a>(tree: &'a VisualTree, metrics: &dyn TextMetrics) -> Vec<Paint<'a>> {
    let mut out = Vec::new();
    let (w, h) = measure(&tree.root, metrics);
    place(&tree.root, Rect { x: 0.0, y: 0.0, w, h }, metrics, &mut out);
    out
}

/// Intrinsic size of a node.
fn measure(node: &Node, metrics: &dyn TextMetrics) -> (f32, f32) {
    match node {
        Node::Text(t) => (metrics.text_width(&t.text, t.font_size), t.line_height),
        Node::Image(i) => i.size(),
        Node::Divider(d) => (d.width + 2.0 * d.margin_x, d.height),
        Node::Container(c) => {
            let sizes = c.children.iter().map(|child| measure(child, metrics));
            let (content_w, content_h) = match c.axis {
                Axis::Row => sizes.fold((0.0f32, 0.0f32), |(w, h), (cw, ch)| (w + cw, h.max(ch))),
                Axis::Column => sizes.fold((0.0f32, 0.0f32), |(w, h), (cw, ch)| (w.max(cw), h + ch)),
            };
            (
                c.width.unwrap_or(content_w + 2.0 * c.padding_x + c.padding_right),
                c.height.unwrap_or(content_h),
            )
        }
    }
}

fn place<'a>(node: &'a Node, rect: Rect, metrics: &dyn TextMetrics, out: &mut Vec<Paint<'a>>) {
    match node {
        Node::Container(c) => place_container(c, rect, metrics, out),
        Node::Text(t) => out.push(place_text(t, rect, metrics)),
        Node::Image(i) => out.push(Paint::Image { rect, image: &i.image }),
        Node::Divider(d) => out.push(Paint::Fill {
            rect: Rect { x: rect.x + d.margin_x, y: rect.y, w: d.width, h: d.height },
            color: d.color,
        }),
    }
}

fn place_container<'a>(c: &'a Container, rect: Rect, metrics: &dyn TextMetrics, out: &mut Vec<Paint<'a>>) {
    if let Some(color) = c.background {
        out.push(Paint::Fill { rect, color });
    }

    let content = Rect {
        x: rect.x + c.padding_x,
        y: rect.y,
        w: (rect.w - 2.0 * c.padding_x - c.padding_right).max(0.0),
        h: rect.h,
    };
    let sizes: Vec<(f32, f32)> = c.children.iter().map(|child| measure(child, metrics)).collect();
    let growing = c.children.iter().filter(|child| grows(child)).count();

    match c.axis {
        Axis::Column => {
            let fixed: f32 = c
                .children
                .iter()
                .zip(&sizes)
                .filter(|(child, _)| !grows(child))
                .map(|(_, (_, h))| h)
                .sum();
            let share = if growing > 0 { ((content.h - fixed) / growing as f32).max(0.0) } else { 0.0 };

            let mut y = content.y;
            for (child, (cw, ch)) in c.children.iter().zip(&sizes) {
                let h = if grows(child) { share } else { *ch };
                let w = match child {
                    Node::Container(_) => content.w,
                    _ => *cw,
                };
                place(child, Rect { x: content.x, y, w, h }, metrics, out);
                y += h;
            }
        }
        Axis::Row => {
            let fixed: f32 = c
                .children
                .iter()
                .zip(&sizes)
                .filter(|(child, _)| !grows(child))
                .map(|(_, (w, _))| w)
                .sum();
            let share = if growing > 0 { ((content.w - fixed) / growing as f32).max(0.0) } else { 0.0 };

            let mut x = content.x;
            for (child, (cw, ch)) in c.children.iter().zip(&sizes) {
                let w = if grows(child) { share } else { *cw };
                let y = content.y + (content.h - ch) / 2.0;
                place(child, Rect { x, y, w, h: *ch }, metrics, out);
                x += w;
            }
        }
    }
}

fn grows(node: &Node) -> bool {
    matches!(node, Node::Container(inner) if inner.grow)
}

/// Center the glyph box inside the line box, splitting the leading evenly.
fn place_text<'a>(t: &'a TextLeaf, rect: Rect, metrics: &dyn TextMetrics) -> Paint<'a> {
    let (ascent, descent) = metrics.vertical_metrics(t.font_size);
    let glyph_height = ascent - descent;
    let baseline = rect.y + (t.line_height - glyph_height) / 2.0 + ascent;
    Paint::Text { x: rect.x, baseline, text: &t.text, font_size: t.font_size, color: t.color }
}
