//! Content loader capability.

use std::fmt;

use thiserror::Error;

#[cfg(test)]
use mockall::mock;

/// The kind of asset a content loader can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// An HTML template body, addressed by template name.
    Template,
    /// A locale dictionary, addressed by language code.
    Locale,
    /// A stylesheet, addressed by file name.
    Stylesheet,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template => write!(f, "template"),
            Self::Locale => write!(f, "locale"),
            Self::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// Errors raised by a content loader
#[derive(Debug, Error)]
pub enum ContentLoadError {
    /// The requested asset does not exist
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// The kind of asset that was requested
        kind: ContentKind,
        /// The name the asset was requested under
        name: String,
    },

    /// The asset exists but could not be read
    #[error("failed to read {kind} '{name}'")]
    Unreadable {
        /// The kind of asset that was requested
        kind: ContentKind,
        /// The name the asset was requested under
        name: String,
        /// The underlying read failure
        #[source]
        source: std::io::Error,
    },
}

/// Content loader capability
pub trait ContentLoader: Clone + Send + Sync + 'static {
    /// Load a content asset.
    ///
    /// # Arguments
    ///
    /// * `kind` - The [`ContentKind`] to load.
    /// * `name` - The template name, language code, or stylesheet file name.
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the asset body, or a [`ContentLoadError`] when
    /// it is absent or unreadable.
    fn load(&self, kind: ContentKind, name: &str) -> Result<String, ContentLoadError>;
}

#[cfg(test)]
mock! {
    pub ContentLoader {}

    impl Clone for ContentLoader {
        fn clone(&self) -> Self;
    }

    impl ContentLoader for ContentLoader {
        fn load(&self, kind: ContentKind, name: &str) -> Result<String, ContentLoadError>;
    }
}
