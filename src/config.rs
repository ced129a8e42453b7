//! Application constants and platform paths.

use anyhow::Result;
use directories::ProjectDirs;
use std::path::PathBuf;

/// File name of the persistent perceptual-hash cache.
pub const CACHE_FILE_NAME: &str = "phash-cache.json";

/// Upper bound on decodable image size, in pixels (200 megapixels).
/// Anything larger is treated as corrupt rather than decoded.
pub const MAX_IMAGE_PIXELS: u64 = 200_000_000;

/// Resolve the default platform-specific cache path.
///
/// XDG data directory on Linux, `AppData` on Windows, `Application
/// Support` on macOS. The same location is reused across invocations so
/// the cache grows monotonically.
///
/// # Errors
///
/// Fails when no home directory can be determined for the current user.
pub fn default_cache_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "pixdupe", "pixdupe")
        .ok_or_else(|| anyhow::anyhow!("failed to determine platform data directory"))?;
    Ok(project_dirs.data_dir().join(CACHE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_path_ends_with_cache_file() {
        let path = default_cache_path().unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(CACHE_FILE_NAME)
        );
    }
}
