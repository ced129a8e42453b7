//! Duplicate detection module.
//!
//! This module provides:
//! - Cache-aware grouping of files by exact perceptual hash
//! - Duplicate group management
//! - Resolution-based retention selection

pub mod finder;
pub mod groups;
pub mod retention;

pub use finder::DuplicateFinder;
pub use groups::DuplicateGroup;
pub use retention::{select_keeper, RetentionDecision};
