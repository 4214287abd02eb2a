use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Provenance of a parsed record: where in which document it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFragment {
    /// Document path as given to the parser
    pub path: String,
    /// First line of the fragment (1-indexed, inclusive)
    pub start_line: u32,
    /// Last line of the fragment (1-indexed, inclusive)
    pub end_line: u32,
    /// Verbatim (normalized) text of the covered lines
    pub text: String,
    /// SHA256 of `text`, lowercase hex
    pub checksum: String,
}

impl SourceFragment {
    /// Build a fragment from the 0-based inclusive line range `start..=end`
    /// of an already normalized document.
    pub fn from_lines(path: &str, lines: &[&str], start: usize, end: usize) -> Self {
        let end = end.min(lines.len().saturating_sub(1));
        let start = start.min(end);
        let text = lines.get(start..=end).map(|l| l.join("\n")).unwrap_or_default();

        Self {
            path: path.to_string(),
            start_line: (start + 1) as u32,
            end_line: (end + 1) as u32,
            checksum: checksum(&text),
            text,
        }
    }

    /// True for the placeholder fragment of hand-built or legacy records
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Number of lines covered
    pub fn line_span(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.end_line - self.start_line + 1
        }
    }

    /// Whether `text` still matches the recorded checksum
    pub fn verify(&self) -> bool {
        checksum(&self.text) == self.checksum
    }
}

/// Compute SHA256 hash of a text fragment
pub fn checksum(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
