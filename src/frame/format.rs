use crate::exif::TagMap;

/// Placeholder printed for missing exposure fields.
///
/// The misspelling is kept so footers stay byte-identical with frames produced
/// by earlier releases. Override it through `frame.placeholder` in the config.
pub const DEFAULT_PLACEHOLDER: &str = "unkonwn";

/// The four strings printed in the footer, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterText {
    pub make: String,
    pub model: String,
    pub lens_model: String,
    /// `50mm  f/2.8  1/200s  ISO100`
    pub exposure: String,
    /// `2023.07.09  20:36:33`
    pub date_time: String,
}

impl FooterText {
    /// Pull the footer fields out of `tags`, substituting `placeholder` for
    /// missing exposure values. Make, model and lens fall back to empty strings.
    pub fn from_tags(tags: &TagMap, placeholder: &str) -> Self {
        let text = |name: &str| tags.non_empty(name).unwrap_or_default().to_string();
        let or_placeholder = |name: &str| tags.non_empty(name).unwrap_or(placeholder);

        let focal_length = tags
            .non_empty("FocalLengthIn35mmFilm")
            .or_else(|| tags.non_empty("FocalLength"))
            .unwrap_or(placeholder);

        let exposure = exposure_summary(
            &format_focal_length(focal_length),
            &format_f_number(or_placeholder("FNumber")),
            or_placeholder("ExposureTime"),
            or_placeholder("ISOSpeedRatings"),
        );

        Self {
            make: text("Make"),
            model: text("Model"),
            lens_model: text("LensModel"),
            exposure,
            date_time: format_date_time(&text("DateTime")),
        }
    }
}

/// `2023:07:09 20:36:33` becomes `2023.07.09  20:36:33`.
///
/// Only the first two space-separated tokens are kept. Anything with fewer
/// tokens is returned as is.
pub fn format_date_time(date_time: &str) -> String {
    if date_time.is_empty() {
        return String::new();
    }
    let mut tokens = date_time.split(' ');
    match (tokens.next(), tokens.next()) {
        (Some(date), Some(time)) => format!("{}  {time}", date.replace(':', ".")),
        _ => date_time.to_string(),
    }
}

/// Normalize an aperture to one decimal place: `f/2.80` -> `f/2.8`, `f/2.0` -> `f/2`.
///
/// Ties round up (`f/2.25` -> `f/2.3`). A bare `f/` reads as zero. Other input
/// that is not a number after the optional `f/` prefix is returned unchanged.
pub fn format_f_number(f_number: &str) -> String {
    let digits = f_number.strip_prefix("f/").unwrap_or(f_number).trim();
    let parsed = if digits.is_empty() { Ok(0.0) } else { digits.parse::<f64>() };
    match parsed {
        Ok(value) if value.is_finite() => {
            let value = (value * 10.0).round() / 10.0;
            let fixed = format!("{value:.1}");
            format!("f/{}", fixed.strip_suffix(".0").unwrap_or(&fixed))
        }
        _ => f_number.to_string(),
    }
}

/// Strip whitespace and make sure the value ends in `mm`: `50 mm` -> `50mm`.
pub fn format_focal_length(focal_length: &str) -> String {
    let compact: String = focal_length.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.ends_with("mm") {
        compact
    } else {
        format!("{compact}mm")
    }
}

/// Focal length, aperture, shutter and ISO separated by two spaces.
pub fn exposure_summary(focal_length: &str, f_number: &str, exposure_time: &str, iso: &str) -> String {
    format!("{focal_length}  {f_number}  {exposure_time}s  ISO{iso}")
}
