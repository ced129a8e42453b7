//! Perceptual image hashing and resolution probing.
//!
//! This module wraps the image decoding and hashing crates behind two
//! operations used by the pipeline:
//!
//! * [`PerceptualHasher::hash_path`] turns a file into a fixed-size
//!   perceptual hash, or an error the caller records as a corrupt file.
//! * [`probe_resolution`] reads an image's pixel count from its header,
//!   independently of hashing, for retention ranking.
//!
//! The hash is a DCT/median hash (pHash): visually identical images
//! produce identical hashes even when stored at different quality
//! settings, which is what exact-equality grouping relies on.

use image::ImageReader;
use image_hasher::{HashAlg, HasherConfig, ImageHash};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::MAX_IMAGE_PIXELS;

/// A perceptual hash in its stable serialized form (base64 of the hash
/// bits).
///
/// Supports equality, hashing, and round-trips through the cache blob
/// unchanged. Grouping compares these values byte-for-byte; there is no
/// distance threshold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phash(String);

impl Phash {
    /// Wrap an already-encoded hash string without validating it against
    /// the hasher configuration. Used when fabricating cache entries.
    #[must_use]
    pub fn from_base64_unchecked(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    fn from_image_hash(hash: &ImageHash) -> Self {
        Self(hash.to_base64())
    }

    /// The base64 form of the hash bits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Phash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors from decoding or hashing an image.
///
/// Every variant marks the file as corrupt for the rest of the run; none
/// of them abort the pipeline.
#[derive(Debug, Error)]
pub enum PerceptualError {
    /// The file could not be opened or decoded as an image.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image exceeds the pixel budget and is refused before decoding.
    #[error("image {path} is {width}x{height}, over the {limit}-pixel limit")]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        limit: u64,
    },
}

/// Computes perceptual hashes for image files.
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    /// Create a hasher with the DCT/median (pHash) configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = HasherConfig::new().hash_alg(HashAlg::Median).preproc_dct();
        Self {
            hasher: config.to_hasher(),
        }
    }

    /// Compute the perceptual hash for the image at `path`.
    ///
    /// The dimensions are checked against [`MAX_IMAGE_PIXELS`] before the
    /// pixel data is decoded, so an oversized file never occupies memory.
    ///
    /// # Errors
    ///
    /// Returns [`PerceptualError`] when the file cannot be decoded or is
    /// over the pixel budget.
    pub fn hash_path(&self, path: &Path) -> Result<Phash, PerceptualError> {
        let (width, height) = read_dimensions(path)?;
        if u64::from(width) * u64::from(height) > MAX_IMAGE_PIXELS {
            return Err(PerceptualError::TooLarge {
                path: path.to_path_buf(),
                width,
                height,
                limit: MAX_IMAGE_PIXELS,
            });
        }

        let img = open_reader(path)?
            .decode()
            .map_err(|source| PerceptualError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Phash::from_image_hash(&self.hasher.hash_image(&img)))
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Read an image's resolution (width × height in pixels) from its header.
///
/// Deliberately independent of hash computation: retention ranking
/// re-reads the file as it stands now, not as it was when hashed.
///
/// # Errors
///
/// Returns [`PerceptualError::Decode`] when the header cannot be read.
pub fn probe_resolution(path: &Path) -> Result<u64, PerceptualError> {
    let (width, height) = read_dimensions(path)?;
    Ok(u64::from(width) * u64::from(height))
}

/// Open an image reader with the format sniffed from file content,
/// falling back to the extension. Extension-less and misnamed files are
/// still attempted; the walk has no extension filter.
fn open_reader(
    path: &Path,
) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, PerceptualError> {
    ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|source| PerceptualError::Decode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(source),
        })
}

/// Read width and height from the image header without decoding pixels.
fn read_dimensions(path: &Path) -> Result<(u32, u32), PerceptualError> {
    open_reader(path)?
        .into_dimensions()
        .map_err(|source| PerceptualError::Decode {
            path: path.to_path_buf(),
            source,
        })
}
