//! Scanner module: perceptual hashing of image files.
//!
//! The directory walk itself lives with the grouping logic in
//! [`crate::duplicates`]; this module owns the image-facing side of the
//! pipeline: decoding, the pixel budget, hash computation, and the
//! resolution probe used for retention ranking.

pub mod perceptual;

pub use perceptual::{probe_resolution, PerceptualError, PerceptualHasher, Phash};
