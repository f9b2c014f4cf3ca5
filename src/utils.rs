//! Utility functions for file operations and path manipulation

use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Get a unique path for a file, handling collisions according to the specified action
///
/// # Returns
///
/// - `Overwrite`: the original path, unchanged.
/// - `Skip`: `None` if the file already exists, otherwise the original path.
/// - `Rename`: the original path if free, otherwise the first free
///   `stem (N).ext` sibling.
///
/// # Examples
///
/// ```
/// use sentence_harvest::utils::get_unique_path;
/// use sentence_harvest::config::FileCollisionAction;
/// use std::path::Path;
///
/// let path = Path::new("/tmp/level-5-bilingual.txt");
/// let unique = get_unique_path(path, FileCollisionAction::Rename).unwrap();
/// // If /tmp/level-5-bilingual.txt exists, returns /tmp/level-5-bilingual (1).txt
/// ```
pub fn get_unique_path(path: &Path, action: FileCollisionAction) -> Result<Option<PathBuf>> {
    match action {
        FileCollisionAction::Overwrite => Ok(Some(path.to_path_buf())),
        FileCollisionAction::Skip => {
            if path.exists() {
                return Ok(None);
            }
            Ok(Some(path.to_path_buf()))
        }
        FileCollisionAction::Rename => {
            if !path.exists() {
                return Ok(Some(path.to_path_buf()));
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
                Error::Delivery(format!("cannot extract file stem from {}", path.display()))
            })?;
            let extension = path.extension().and_then(|e| e.to_str());
            let parent = path.parent().ok_or_else(|| {
                Error::Delivery(format!("cannot extract parent directory of {}", path.display()))
            })?;

            // Try adding (1), (2), (3), ... until we find a unique name
            for i in 1..=MAX_RENAME_ATTEMPTS {
                let new_name = match extension {
                    Some(ext) => format!("{} ({}).{}", stem, i, ext),
                    None => format!("{} ({})", stem, i),
                };
                let new_path = parent.join(new_name);
                if !new_path.exists() {
                    return Ok(Some(new_path));
                }
            }

            Err(Error::Delivery(format!(
                "could not find unique filename for {} after {} attempts",
                path.display(),
                MAX_RENAME_ATTEMPTS
            )))
        }
    }
}

/// True if `name` is a bare file name that stays inside its directory
///
/// Rejects empty names, `.`/`..`, path separators and NUL bytes.
#[must_use]
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
