//! Screenshot file storage
//!
//! Named screenshots are written into a single directory. Callers supply a
//! file name, but only its final path component is ever used, so a request
//! for `../../etc/passwd` lands at `<dir>/passwd`.
//!
//! # Examples
//!
//! ```
//! use autogui_core::{capture::ImageBuffer, util::screenshot_files::ScreenshotStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ScreenshotStore::new(dir.path().join("screenshots"));
//!
//! let img = ImageBuffer::from_test_pattern(16, 16);
//! let path = store.save(&img, "../../etc/passwd").unwrap();
//! assert_eq!(path, dir.path().join("screenshots").join("passwd"));
//! ```

use std::{fs, path::PathBuf};

use tracing::debug;

use crate::{
    capture::ImageBuffer,
    error::{AutomationError, AutomationResult},
    util::encode::{SaveFormat, encode_as},
};

/// Reduces a caller-supplied path to its base name
///
/// Both `/` and `\` are treated as separators regardless of host platform.
/// Returns `None` when nothing usable remains (`""`, `".."`, `"dir/"`).
///
/// ```
/// use autogui_core::util::screenshot_files::sanitize_filename;
///
/// assert_eq!(sanitize_filename("shot.png").as_deref(), Some("shot.png"));
/// assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
/// assert_eq!(sanitize_filename("C:\\temp\\a.png").as_deref(), Some("a.png"));
/// assert_eq!(sanitize_filename(".."), None);
/// ```
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Writes encoded screenshots under a fixed directory
#[derive(Clone, Debug)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolves the save path for a caller-supplied file name
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::InvalidParameter`] for `filename` when the
    /// name has no usable base name.
    pub fn resolve(&self, filename: &str) -> AutomationResult<PathBuf> {
        let name = sanitize_filename(filename).ok_or_else(|| {
            AutomationError::invalid_parameter(
                "filename",
                format!("'{}' does not contain a file name", filename),
            )
        })?;
        Ok(self.dir.join(name))
    }

    /// Encodes `image` by extension and writes it, returning the saved path
    ///
    /// The directory is created if it does not exist yet. An existing file
    /// with the same name is overwritten.
    pub fn save(&self, image: &ImageBuffer, filename: &str) -> AutomationResult<PathBuf> {
        let path = self.resolve(filename)?;
        let format = SaveFormat::for_path(&path);
        let bytes = encode_as(image, format)?;

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, &bytes)?;

        debug!(
            "Saved {} screenshot ({} bytes) to {}",
            format.as_str(),
            bytes.len(),
            path.display()
        );
        Ok(path)
    }
}
