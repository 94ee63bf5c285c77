/// Landscape when the photo is strictly wider than tall, portrait otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(width: u32, height: u32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// Footer sizes, all proportional to the footer height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FooterGeometry {
    pub orientation: Orientation,
    pub footer_height: f32,
    pub primary_font_size: f32,
    pub primary_line_height: f32,
    pub secondary_font_size: f32,
    pub secondary_line_height: f32,
    pub logo_height: f32,
    pub divider_height: f32,
    pub divider_margin: f32,
    pub divider_opacity: f32,
    /// Horizontal padding of the footer band, also used as the gap right of
    /// the model/lens column.
    pub padding: f32,
}

impl FooterGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        let orientation = Orientation::of(width, height);
        let h = height as f32;
        let fh = match orientation {
            Orientation::Landscape => h * 0.16,
            Orientation::Portrait => h * 0.10,
        };
        let (primary_font, primary_line, secondary_font, secondary_line, opacity) = match orientation {
            Orientation::Landscape => (0.20, 0.30, 0.15, 0.20, 0.2),
            Orientation::Portrait => (0.18, 0.26, 0.14, 0.18, 0.4),
        };

        Self {
            orientation,
            footer_height: fh,
            primary_font_size: fh * primary_font,
            primary_line_height: fh * primary_line,
            secondary_font_size: fh * secondary_font,
            secondary_line_height: fh * secondary_line,
            logo_height: fh * 0.46,
            divider_height: fh * 0.56,
            divider_margin: fh * 0.16,
            divider_opacity: opacity,
            padding: fh * 0.30,
        }
    }

    /// Divider stroke width; the footer never draws it thinner than a pixel.
    pub fn divider_width(&self) -> f32 {
        (self.footer_height * 0.006).max(1.0)
    }
}
