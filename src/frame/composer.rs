use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};

use super::footer::build_tree;
use super::format::FooterText;
use super::geometry::FooterGeometry;
use super::logo::{load_logo, resolve_logo};
use crate::config::{Config, LogoFailure};
use crate::error::{FrameError, Result};
use crate::exif::TagMap;
use crate::render::{EncodedImage, Rasterizer, Stage};

/// Builds the framed composite for one photo at a time.
///
/// All compositions of one composer share a single [`Stage`], so concurrent
/// [`compose`](Self::compose) calls rasterize one after another.
///
/// # Example
///
/// ```rust,no_run
/// use exif_frame::config::Config;
/// use exif_frame::exif::read_tags;
/// use exif_frame::frame::FrameComposer;
/// use exif_frame::render::SoftwareRasterizer;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let composer = FrameComposer::new(SoftwareRasterizer::with_system_font()?, &config);
///
/// let bytes = std::fs::read("photo.jpg")?;
/// let tags = read_tags(&bytes)?;
/// match composer.compose(&bytes, &tags).await? {
///     Some(framed) => std::fs::write("photo_frame.jpg", &framed.bytes)?,
///     None => eprintln!("rendering failed"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct FrameComposer<R> {
    rasterizer: R,
    stage: Stage,
    placeholder: String,
    quality: f32,
    logo_dir: PathBuf,
    logo_failure: LogoFailure,
}

impl<R: Rasterizer> FrameComposer<R> {
    pub fn new(rasterizer: R, config: &Config) -> Self {
        Self {
            rasterizer,
            stage: Stage::new(),
            placeholder: config.frame.placeholder.clone(),
            quality: config.frame.jpeg_quality,
            logo_dir: config.assets.logo_dir.clone(),
            logo_failure: config.frame.logo_failure,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Frame `image` with a footer built from `tags`.
    ///
    /// Decode and logo failures are returned as errors. A rasterizer failure
    /// is logged and reported as `Ok(None)`.
    pub async fn compose(&self, image: &[u8], tags: &TagMap) -> Result<Option<EncodedImage>> {
        let photo = decode_image(image.to_vec()).await?;
        let (width, height) = photo.dimensions();
        log::debug!("Decoded {width}x{height} photo");

        let text = FooterText::from_tags(tags, &self.placeholder);
        let geometry = FooterGeometry::new(width, height);
        let logo = self.logo_for(&text.make).await?;
        let tree = build_tree(Arc::new(photo), &text, &geometry, logo);

        let mounted = self.stage.mount(tree).await;
        match self.rasterizer.rasterize(mounted.tree(), self.quality).await {
            Ok(encoded) => {
                log::debug!(
                    "Rendered {}x{} composite ({} bytes)",
                    encoded.width,
                    encoded.height,
                    encoded.bytes.len()
                );
                Ok(Some(encoded))
            }
            Err(e) => {
                log::error!("{} rasterizer failed: {e:#}", self.rasterizer.name());
                Ok(None)
            }
        }
    }

    async fn logo_for(&self, make: &str) -> Result<Option<Arc<RgbaImage>>> {
        let Some(asset) = resolve_logo(make) else {
            if !make.is_empty() {
                log::debug!("No logo for make {make:?}");
            }
            return Ok(None);
        };

        match load_logo(&self.logo_dir, asset).await {
            Ok(logo) => Ok(Some(logo)),
            Err(e) if self.logo_failure == LogoFailure::Omit => {
                log::warn!("{e} ({}), framing without a logo", asset.path_in(&self.logo_dir).display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Decode off the executor, applying the EXIF orientation like a browser does.
async fn decode_image(bytes: Vec<u8>) -> Result<RgbaImage> {
    let decoded = tokio::task::spawn_blocking(move || decode_oriented(&bytes)).await;
    match decoded {
        Ok(Ok(img)) if img.width() > 0 && img.height() > 0 => Ok(img),
        Ok(Ok(_)) => Err(FrameError::Decode),
        Ok(Err(e)) => {
            log::debug!("Image decode failed: {e}");
            Err(FrameError::Decode)
        }
        Err(e) => {
            log::debug!("Image decode task failed: {e}");
            Err(FrameError::Decode)
        }
    }
}

fn decode_oriented(bytes: &[u8]) -> image::ImageResult<RgbaImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img.into_rgba8())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::render::{Node, VisualTree};
    use crate::test_support::{plain_jpeg, solid_png};
    use tempfile::TempDir;

    /// What the rasterizer saw of a tree.
    #[derive(Debug, Clone, PartialEq)]
    struct Seen {
        width: u32,
        height: u32,
        dividers: Vec<f32>,
        images: usize,
        texts: Vec<String>,
    }

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<Seen>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Rasterizer for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn rasterize(&self, tree: &VisualTree, _quality: f32) -> anyhow::Result<EncodedImage> {
            self.seen.lock().unwrap().push(Seen {
                width: tree.width,
                height: tree.height,
                dividers: tree.dividers().map(|d| d.color.a).collect(),
                images: tree.images().count(),
                texts: tree.texts().map(|t| t.text.clone()).collect(),
            });
            if self.fail {
                anyhow::bail!("renderer crashed");
            }
            Ok(EncodedImage { bytes: vec![1, 2, 3], width: tree.width, height: tree.height })
        }
    }

    fn config_with_logos(dir: &TempDir, policy: LogoFailure) -> Config {
        let mut config = Config::default();
        config.assets.logo_dir = dir.path().to_path_buf();
        config.frame.logo_failure = policy;
        config
    }

    fn canon_tags() -> TagMap {
        [
            ("Make", "Canon"),
            ("Model", "EOS R5"),
            ("FNumber", "f/2.8"),
            ("FocalLength", "50mm"),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn landscape_canon_frame() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("canon.png"), solid_png(40, 10, [200, 0, 0, 255])).unwrap();
        let composer = FrameComposer::new(Recording::default(), &config_with_logos(&dir, LogoFailure::Abort));

        let out = composer.compose(&solid_png(400, 300, [0, 0, 0, 255]), &canon_tags()).await.unwrap();
        let out = out.unwrap();
        assert_eq!((out.width, out.height), (400, 348));

        let seen = composer.rasterizer().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].dividers.len(), 1);
        assert!((seen[0].dividers[0] - 0.2).abs() < 1e-6);
        // photo + logo
        assert_eq!(seen[0].images, 2);
        assert_eq!(seen[0].texts[0], "EOS R5");
        assert_eq!(seen[0].texts[2], "50mm  f/2.8  unkonwns  ISOunkonwn");
        assert!(composer.stage().is_idle());
    }

    #[tokio::test]
    async fn portrait_uses_portrait_ratios() {
        let dir = TempDir::new().unwrap();
        let tags: TagMap = [("Make", "Samsung")].into_iter().collect();
        let composer = FrameComposer::new(Recording::default(), &config_with_logos(&dir, LogoFailure::Abort));

        let out = composer.compose(&plain_jpeg(300, 400), &tags).await.unwrap().unwrap();
        assert_eq!((out.width, out.height), (300, 440));

        let seen = composer.rasterizer().seen.lock().unwrap();
        assert!((seen[0].dividers[0] - 0.4).abs() < 1e-6);
        assert_eq!(seen[0].images, 1);
    }

    #[tokio::test]
    async fn empty_make_requests_no_logo_and_no_divider() {
        // Abort policy with an empty logo dir: any logo request would fail.
        let dir = TempDir::new().unwrap();
        let composer = FrameComposer::new(Recording::default(), &config_with_logos(&dir, LogoFailure::Abort));

        let out = composer.compose(&plain_jpeg(64, 48), &TagMap::new()).await.unwrap();
        assert!(out.is_some());

        let seen = composer.rasterizer().seen.lock().unwrap();
        assert!(seen[0].dividers.is_empty());
        assert_eq!(seen[0].images, 1);
    }

    #[tokio::test]
    async fn rasterizer_failure_yields_none() {
        let rasterizer = Recording { fail: true, ..Default::default() };
        let composer = FrameComposer::new(rasterizer, &Config::default());

        let out = composer.compose(&plain_jpeg(32, 32), &TagMap::new()).await.unwrap();
        assert!(out.is_none());
        assert!(composer.stage().is_idle());
    }

    #[tokio::test]
    async fn undecodable_image_is_decode_error() {
        let composer = FrameComposer::new(Recording::default(), &Config::default());

        let err = composer.compose(b"not an image", &canon_tags()).await.unwrap_err();
        assert!(matches!(err, FrameError::Decode));
        assert!(composer.rasterizer().seen.lock().unwrap().is_empty());
        assert!(composer.stage().is_idle());
    }

    #[tokio::test]
    async fn missing_logo_aborts_by_default() {
        let dir = TempDir::new().unwrap();
        let composer = FrameComposer::new(Recording::default(), &config_with_logos(&dir, LogoFailure::Abort));

        let err = composer.compose(&plain_jpeg(40, 30), &canon_tags()).await.unwrap_err();
        assert!(matches!(err, FrameError::LogoLoad { .. }));
        assert!(composer.rasterizer().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_logo_omitted_when_configured() {
        let dir = TempDir::new().unwrap();
        let composer = FrameComposer::new(Recording::default(), &config_with_logos(&dir, LogoFailure::Omit));

        let out = composer.compose(&plain_jpeg(40, 30), &canon_tags()).await.unwrap();
        assert!(out.is_some());

        let seen = composer.rasterizer().seen.lock().unwrap();
        assert_eq!(seen[0].images, 1);
        assert_eq!(seen[0].dividers.len(), 1);
    }

    /// Sleeps while rasterizing and records the highest number of overlapping calls.
    #[derive(Default)]
    struct Slow {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Rasterizer for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn rasterize(&self, tree: &VisualTree, _quality: f32) -> anyhow::Result<EncodedImage> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(matches!(tree.root, Node::Container(_)));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(EncodedImage { bytes: Vec::new(), width: tree.width, height: tree.height })
        }
    }

    #[tokio::test]
    async fn concurrent_compositions_do_not_overlap() {
        let composer = FrameComposer::new(Slow::default(), &Config::default());
        let a = plain_jpeg(20, 10);
        let b = plain_jpeg(10, 20);
        let tags = TagMap::new();

        let (ra, rb) = tokio::join!(composer.compose(&a, &tags), composer.compose(&b, &tags));
        assert_eq!(ra.unwrap().unwrap().width, 20);
        assert_eq!(rb.unwrap().unwrap().width, 10);
        assert_eq!(composer.rasterizer().peak.load(Ordering::SeqCst), 1);
        assert!(composer.stage().is_idle());
    }
}
