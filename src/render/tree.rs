use std::sync::Arc;

use image::RgbaImage;

/// An sRGB color with straight alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_rgb(0xFFFFFF);

    pub const fn from_rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

/// A flex-style box. Children are laid out along `axis`.
#[derive(Debug, Clone)]
pub struct Container {
    /// Identifies the box in tests and debug logs.
    pub name: &'static str,
    pub axis: Axis,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Applied on both the left and the right.
    pub padding_x: f32,
    /// Extra padding on the right, on top of `padding_x`.
    pub padding_right: f32,
    /// Take the remaining main-axis space of the parent.
    pub grow: bool,
    pub background: Option<Color>,
    pub children: Vec<Node>,
}

impl Container {
    pub fn new(name: &'static str, axis: Axis) -> Self {
        Self {
            name,
            axis,
            width: None,
            height: None,
            padding_x: 0.0,
            padding_right: 0.0,
            grow: false,
            background: None,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }
}

/// One line of text; whitespace is rendered as is.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLeaf {
    pub text: String,
    pub font_size: f32,
    pub line_height: f32,
    pub color: Color,
}

/// A bitmap, scaled to `height` (keeping aspect) when one is given.
#[derive(Debug, Clone)]
pub struct ImageLeaf {
    pub image: Arc<RgbaImage>,
    pub height: Option<f32>,
}

impl ImageLeaf {
    /// Display size after applying `height`.
    pub fn size(&self) -> (f32, f32) {
        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        match self.height {
            Some(target) if h > 0.0 => (w * target / h, target),
            Some(target) => (0.0, target),
            None => (w, h),
        }
    }
}

/// A vertical rule with horizontal margins.
#[derive(Debug, Clone, PartialEq)]
pub struct DividerLeaf {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub enum Node {
    Container(Container),
    Text(TextLeaf),
    Image(ImageLeaf),
    Divider(DividerLeaf),
}

impl Node {
    /// Depth-first search for a container by name.
    pub fn find(&self, name: &str) -> Option<&Container> {
        match self {
            Node::Container(c) if c.name == name => Some(c),
            Node::Container(c) => c.children.iter().find_map(|child| child.find(name)),
            _ => None,
        }
    }

    /// Every node of the subtree, depth first.
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = vec![self];
        if let Node::Container(c) = self {
            for child in &c.children {
                out.extend(child.walk());
            }
        }
        out
    }
}

/// A complete composition ready for rasterization.
#[derive(Debug, Clone)]
pub struct VisualTree {
    pub root: Node,
    /// Output size in whole pixels.
    pub width: u32,
    pub height: u32,
}

impl VisualTree {
    pub fn dividers(&self) -> impl Iterator<Item = &DividerLeaf> {
        self.root.walk().into_iter().filter_map(|node| match node {
            Node::Divider(d) => Some(d),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextLeaf> {
        self.root.walk().into_iter().filter_map(|node| match node {
            Node::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageLeaf> {
        self.root.walk().into_iter().filter_map(|node| match node {
            Node::Image(i) => Some(i),
            _ => None,
        })
    }
}
