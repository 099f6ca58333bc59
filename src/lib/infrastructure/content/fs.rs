//! Filesystem content loader.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::domain::mail::{ContentKind, ContentLoadError, ContentLoader};

/// Content directory configuration
#[derive(Clone, Debug, Parser)]
pub struct ContentDirConfig {
    /// The directory holding `templates/`, `locales/`, and `styles/`
    #[clap(long, env = "CONTENT_DIR", default_value = "content")]
    pub content_dir: PathBuf,
}

/// Loads templates, locales, and stylesheets from a content directory.
///
/// Templates live at `templates/<name>.html`, locales at
/// `locales/<language>.json`, and stylesheets at `styles/<file>`. Every load
/// reads from disk, so edits to content files take effect on the next send.
#[derive(Debug, Clone)]
pub struct FsContentLoader {
    root: PathBuf,
}

impl FsContentLoader {
    /// A loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// A loader rooted at the configured content directory.
    pub fn from_config(config: &ContentDirConfig) -> Self {
        Self::new(&config.content_dir)
    }

    /// The directory this loader reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, kind: ContentKind, name: &str) -> PathBuf {
        match kind {
            ContentKind::Template => self.root.join("templates").join(format!("{name}.html")),
            ContentKind::Locale => self.root.join("locales").join(format!("{name}.json")),
            ContentKind::Stylesheet => self.root.join("styles").join(name),
        }
    }
}

impl ContentLoader for FsContentLoader {
    fn load(&self, kind: ContentKind, name: &str) -> Result<String, ContentLoadError> {
        // Names address files inside the content root only.
        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(ContentLoadError::NotFound {
                kind,
                name: name.to_string(),
            });
        }

        std::fs::read_to_string(self.path_for(kind, name)).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ContentLoadError::NotFound {
                kind,
                name: name.to_string(),
            },
            _ => ContentLoadError::Unreadable {
                kind,
                name: name.to_string(),
                source: err,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{distributions::Alphanumeric, Rng};
    use testresult::TestResult;

    use super::*;

    struct TempContentDir {
        root: PathBuf,
    }

    impl TempContentDir {
        fn new() -> std::io::Result<Self> {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();

            let root = std::env::temp_dir().join(format!("postbox-content-{suffix}"));

            for subdir in ["templates", "locales", "styles"] {
                std::fs::create_dir_all(root.join(subdir))?;
            }

            Ok(Self { root })
        }
    }

    impl Drop for TempContentDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn test_path_layout_per_kind() {
        let loader = FsContentLoader::new("/srv/content");

        assert_eq!(
            loader.path_for(ContentKind::Template, "welcome"),
            PathBuf::from("/srv/content/templates/welcome.html")
        );
        assert_eq!(
            loader.path_for(ContentKind::Locale, "en"),
            PathBuf::from("/srv/content/locales/en.json")
        );
        assert_eq!(
            loader.path_for(ContentKind::Stylesheet, "base.css"),
            PathBuf::from("/srv/content/styles/base.css")
        );
    }

    #[test]
    fn test_load_reads_template_body() -> TestResult {
        let dir = TempContentDir::new()?;

        std::fs::write(
            dir.root.join("templates").join("welcome.html"),
            "<p>welcome</p>",
        )?;

        let loader = FsContentLoader::new(&dir.root);

        assert_eq!(
            loader.load(ContentKind::Template, "welcome")?,
            "<p>welcome</p>"
        );

        Ok(())
    }

    #[test]
    fn test_load_missing_asset() -> TestResult {
        let dir = TempContentDir::new()?;
        let loader = FsContentLoader::new(&dir.root);

        let result = loader.load(ContentKind::Locale, "xx");

        assert!(matches!(
            result,
            Err(ContentLoadError::NotFound { kind: ContentKind::Locale, name }) if name == "xx"
        ));

        Ok(())
    }

    #[test]
    fn test_load_rejects_names_that_leave_the_root() -> TestResult {
        let dir = TempContentDir::new()?;
        let loader = FsContentLoader::new(&dir.root);

        for name in ["../secrets", "a/b", "a\\b", ".."] {
            let result = loader.load(ContentKind::Template, name);

            assert!(matches!(result, Err(ContentLoadError::NotFound { .. })));
        }

        Ok(())
    }
}
