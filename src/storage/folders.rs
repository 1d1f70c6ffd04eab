//! Category storage locations

use crate::crawler::Section;
use crate::HarvestError;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

/// What category materialization did
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
    pub failed: Vec<(String, HarvestError)>,
}

impl MaterializeReport {
    /// Categories that have a usable directory
    pub fn ready(&self) -> usize {
        self.created.len() + self.existing.len()
    }
}

/// Ensures a directory named after each section's category exists under `root`
///
/// Create-if-absent and idempotent. Each distinct category is handled once;
/// a failure is recorded and the remaining categories are still processed.
pub fn ensure_category_storage(root: &Path, sections: &[Section]) -> MaterializeReport {
    let mut report = MaterializeReport::default();
    let mut seen = HashSet::new();

    for section in sections {
        let category = section.category();
        if !seen.insert(category) {
            continue;
        }

        let path = root.join(category);
        match create_if_absent(&path) {
            Ok(true) => {
                tracing::info!(category, path = %path.display(), "Category folder created");
                report.created.push(category.to_string());
            }
            Ok(false) => {
                tracing::info!(category, "Category folder already exists");
                report.existing.push(category.to_string());
            }
            Err(error) => {
                tracing::error!(
                    category,
                    phase = error.phase(),
                    error = %error,
                    "Category folder creation failed"
                );
                report.failed.push((category.to_string(), error));
            }
        }
    }

    report
}

/// Returns `Ok(true)` when the directory was created by this call
fn create_if_absent(path: &Path) -> Result<bool, HarvestError> {
    if path.is_dir() {
        return Ok(false);
    }

    match std::fs::create_dir(path) {
        Ok(()) => Ok(true),
        // Lost a race with another creator
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(false),
        Err(source) => Err(HarvestError::Storage {
            path: path.to_path_buf(),
            source,
        }),
    }
}
