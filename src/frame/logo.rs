use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::error::{FrameError, Result};

/// A bundled manufacturer logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoAsset {
    /// Lowercase fragment searched for in the Make tag.
    pub fragment: &'static str,
    /// File name under the logo directory.
    pub file: &'static str,
}

/// Ordered lookup; the first fragment contained in the make wins.
pub const LOGOS: &[LogoAsset] = &[
    LogoAsset { fragment: "apple", file: "apple.png" },
    LogoAsset { fragment: "canon", file: "canon.png" },
    LogoAsset { fragment: "dji", file: "dji.png" },
    LogoAsset { fragment: "fuji", file: "fujifilm.png" },
    LogoAsset { fragment: "hassel", file: "hasselblad.png" },
    LogoAsset { fragment: "leica", file: "leica.png" },
    LogoAsset { fragment: "nikon", file: "nikon.png" },
    LogoAsset { fragment: "olympus", file: "olympus.png" },
    LogoAsset { fragment: "panasonic", file: "panasonic.png" },
    LogoAsset { fragment: "pentax", file: "pentax.png" },
    LogoAsset { fragment: "ricoh", file: "ricoh.png" },
    LogoAsset { fragment: "sony", file: "sony.png" },
    LogoAsset { fragment: "xmage", file: "xmage.png" },
];

/// Find the logo for a Make tag, case-insensitively.
pub fn resolve_logo(make: &str) -> Option<&'static LogoAsset> {
    let make = make.to_lowercase();
    LOGOS.iter().find(|logo| make.contains(logo.fragment))
}

impl LogoAsset {
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file)
    }
}

/// Read and decode a logo from `dir`.
pub async fn load_logo(dir: &Path, asset: &LogoAsset) -> Result<Arc<RgbaImage>> {
    let path = asset.path_in(dir);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("Failed to read logo {}: {e}", path.display());
            return Err(FrameError::LogoLoad { path });
        }
    };

    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;
    match decoded {
        Ok(Ok(img)) => Ok(Arc::new(img.into_rgba8())),
        Ok(Err(e)) => {
            log::debug!("Failed to decode logo {}: {e}", path.display());
            Err(FrameError::LogoLoad { path })
        }
        Err(e) => {
            log::debug!("Logo decode task failed for {}: {e}", path.display());
            Err(FrameError::LogoLoad { path })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::solid_png;
    use tempfile::TempDir;

    #[test]
    fn resolves_case_insensitively() {
        assert_eq!(resolve_logo("Canon").map(|l| l.file), Some("canon.png"));
        assert_eq!(resolve_logo("NIKON CORPORATION").map(|l| l.file), Some("nikon.png"));
        assert_eq!(resolve_logo("FUJIFILM").map(|l| l.file), Some("fujifilm.png"));
        assert_eq!(resolve_logo("Hasselblad").map(|l| l.file), Some("hasselblad.png"));
        assert_eq!(resolve_logo("OLYMPUS IMAGING CORP.").map(|l| l.file), Some("olympus.png"));
        assert_eq!(resolve_logo("RICOH IMAGING COMPANY, LTD.").map(|l| l.file), Some("ricoh.png"));
    }

    #[test]
    fn no_match() {
        assert_eq!(resolve_logo(""), None);
        assert_eq!(resolve_logo("Samsung"), None);
        assert_eq!(resolve_logo("Google"), None);
    }

    #[test]
    fn first_fragment_wins() {
        // Both "canon" and "sony" appear; canon comes first in the table.
        assert_eq!(resolve_logo("sony canon").map(|l| l.file), Some("canon.png"));
        assert_eq!(resolve_logo("apple by dji").map(|l| l.file), Some("apple.png"));
    }

    #[test]
    fn table_order() {
        let fragments: Vec<_> = LOGOS.iter().map(|l| l.fragment).collect();
        assert_eq!(
            fragments,
            [
                "apple", "canon", "dji", "fuji", "hassel", "leica", "nikon", "olympus",
                "panasonic", "pentax", "ricoh", "sony", "xmage"
            ]
        );
    }

    #[tokio::test]
    async fn loads_png_logo() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sony.png"), solid_png(20, 10, [0, 0, 0, 255])).unwrap();

        let asset = resolve_logo("SONY").unwrap();
        let logo = load_logo(dir.path(), asset).await.unwrap();
        assert_eq!(logo.dimensions(), (20, 10));
    }

    #[tokio::test]
    async fn missing_logo_is_logo_error() {
        let dir = TempDir::new().unwrap();
        let asset = resolve_logo("leica").unwrap();
        let err = load_logo(dir.path(), asset).await.unwrap_err();
        assert!(matches!(err, FrameError::LogoLoad { ref path } if path.ends_with("leica.png")));
        assert_eq!(err.to_string(), "failed to get logo");
    }

    #[tokio::test]
    async fn undecodable_logo_is_logo_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("dji.png"), b"not a png").unwrap();
        let asset = resolve_logo("DJI").unwrap();
        assert!(matches!(load_logo(dir.path(), asset).await, Err(FrameError::LogoLoad { .. })));
    }
}
