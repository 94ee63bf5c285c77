use std::path::PathBuf;

use thiserror::Error;

/// Library error type for metadata extraction and frame composition.
///
/// Rasterization failures are deliberately absent: the composer logs them and
/// returns `None` instead of an error.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The payload could not be parsed as a supported metadata container.
    #[error("failed to extract metadata: {0}")]
    Extraction(String),

    /// The payload could not be decoded as a displayable image.
    #[error("get image size error")]
    Decode,

    /// A resolved manufacturer logo could not be read or decoded.
    #[error("failed to get logo")]
    LogoLoad { path: PathBuf },

    /// Reading an input file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = FrameError> = std::result::Result<T, E>;
