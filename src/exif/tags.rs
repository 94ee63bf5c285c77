use std::collections::BTreeMap;

use serde::Serialize;

/// EXIF tag codes the extractor keeps, with their conventional names.
///
/// IFD0 and the Exif sub-IFD share one namespace here, which matches how
/// photo tools print them.
const TAG_NAMES: &[(u16, &str)] = &[
    (0x010F, "Make"),
    (0x0110, "Model"),
    (0x0112, "Orientation"),
    (0x0131, "Software"),
    (0x0132, "DateTime"),
    (0x829A, "ExposureTime"),
    (0x829D, "FNumber"),
    (0x8822, "ExposureProgram"),
    (0x8827, "ISOSpeedRatings"),
    (0x9003, "DateTimeOriginal"),
    (0x9004, "DateTimeDigitized"),
    (0x9204, "ExposureBiasValue"),
    (0x920A, "FocalLength"),
    (0xA002, "PixelXDimension"),
    (0xA003, "PixelYDimension"),
    (0xA405, "FocalLengthIn35mmFilm"),
    (0xA433, "LensMake"),
    (0xA434, "LensModel"),
];

/// Look up the conventional name of an EXIF tag code.
pub fn tag_name(code: u16) -> Option<&'static str> {
    TAG_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Parsed metadata: tag name to human-readable description.
///
/// Built once per image by [`read_tags`](super::read_tags) and only read
/// afterwards. Serializes as a flat JSON object.
///
/// ```rust
/// use exif_frame::exif::TagMap;
///
/// let tags: TagMap = [("Make", "Canon"), ("FNumber", "f/2.8")].into_iter().collect();
/// assert_eq!(tags.get("Make"), Some("Canon"));
/// assert_eq!(tags.get("LensModel"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagMap {
    entries: BTreeMap<String, String>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Description of `name`, if the image carried that tag.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Description of `name`, treating an empty description as absent.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|s| !s.is_empty())
    }

    /// Insert a description unless the tag is already present.
    ///
    /// The first occurrence wins so thumbnail IFD entries never shadow the
    /// primary image's.
    pub fn insert_first(&mut self, name: impl Into<String>, description: impl Into<String>) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, description.into());
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TagMap::new();
        for (k, v) in iter {
            map.insert_first(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tag_names() {
        assert_eq!(tag_name(0x010F), Some("Make"));
        assert_eq!(tag_name(0x829D), Some("FNumber"));
        assert_eq!(tag_name(0xA405), Some("FocalLengthIn35mmFilm"));
        assert_eq!(tag_name(0xA434), Some("LensModel"));
        assert_eq!(tag_name(0x0001), None);
    }

    #[test]
    fn first_insert_wins() {
        let mut tags = TagMap::new();
        assert!(tags.insert_first("Model", "EOS R5"));
        assert!(!tags.insert_first("Model", "thumbnail"));
        assert_eq!(tags.get("Model"), Some("EOS R5"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn non_empty_skips_blank_descriptions() {
        let tags: TagMap = [("Make", ""), ("Model", "X100V")].into_iter().collect();
        assert_eq!(tags.get("Make"), Some(""));
        assert_eq!(tags.non_empty("Make"), None);
        assert_eq!(tags.non_empty("Model"), Some("X100V"));
    }

    #[test]
    fn serializes_as_flat_object() {
        let tags: TagMap = [("Make", "SONY"), ("ISOSpeedRatings", "100")].into_iter().collect();
        let json = serde_json::to_value(&tags).unwrap();
        assert_eq!(json["Make"], "SONY");
        assert_eq!(json["ISOSpeedRatings"], "100");
    }
}
