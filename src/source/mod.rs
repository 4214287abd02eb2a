//! Reading, decoding and normalizing catalog documents.

mod error;
mod fragment;
mod normalize;


pub use error::InputUnavailable;
pub use fragment::{checksum, SourceFragment};
pub use normalize::normalize_text;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a document from disk and decode it as UTF-8.
///
/// Missing files, IO failures and undecodable bytes all surface as
/// [`InputUnavailable`]; nothing else in the extractor is fatal.
pub fn read_document(path: &Path) -> Result<String, InputUnavailable> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => InputUnavailable::NotFound {
            path: path.to_path_buf(),
        },
        _ => InputUnavailable::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    decode_document(path, bytes)
}

/// Decode raw document bytes as UTF-8
pub fn decode_document(path: &Path, bytes: Vec<u8>) -> Result<String, InputUnavailable> {
    String::from_utf8(bytes).map_err(|e| InputUnavailable::InvalidUtf8 {
        path: path.to_path_buf(),
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}
