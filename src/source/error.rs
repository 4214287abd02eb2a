use std::path::{Path, PathBuf};
use thiserror::Error;

/// A source document could not be turned into text.
///
/// These are the only hard failures of the extractor; everything past
/// decoding is handled permissively and reported as diagnostics.
#[derive(Error, Debug)]
pub enum InputUnavailable {
    #[error("Source document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read source document {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source document {} is not valid UTF-8 (valid up to byte {valid_up_to})", path.display())]
    InvalidUtf8 { path: PathBuf, valid_up_to: usize },
}

impl InputUnavailable {
    /// Path of the document that failed
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Unreadable { path, .. } | Self::InvalidUtf8 { path, .. } => {
                path
            }
        }
    }
}
