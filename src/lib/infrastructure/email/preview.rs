//! HTML preview files for manual inspection.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::Utc;

/// Writes rendered HTML to timestamped files.
///
/// A preview is a plain local-disk side effect; nothing in the send pipeline
/// depends on it. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct PreviewWriter {
    dir: PathBuf,
}

impl PreviewWriter {
    /// A writer placing previews under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory previews are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `html` as `<safe-subject>-<timestamp>.html`.
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the path of the written file.
    pub fn write(&self, subject: &str, html: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f");
        let path = self
            .dir
            .join(format!("{}-{timestamp}.html", safe_subject(subject)));

        fs::write(&path, html)?;

        Ok(path)
    }
}

/// Lowercase the subject and flatten every other character to `_` so it is
/// safe inside a file name.
fn safe_subject(subject: &str) -> String {
    subject
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
