use regex::Regex;
use std::sync::LazyLock;

const BOM: char = '\u{feff}';
const IDEOGRAPHIC_SPACE: char = '\u{3000}';

// ASCII space, no-break space, ideographic space
static RE_SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \u{00A0}\u{3000}]+").unwrap());

/// Canonicalize whitespace, newlines and BOM artifacts of a decoded document.
///
/// Steps, in order:
/// 1. strip leading byte-order marks
/// 2. CRLF / CR -> LF
/// 3. right-trim every line
/// 4. ideographic space -> ASCII space
/// 5. collapse runs of ASCII / no-break / ideographic spaces into one ASCII space
///
/// The number of lines never changes, so line numbers computed on the
/// normalized text point at the same lines of the original document.
pub fn normalize_text(text: &str) -> String {
    let text = text.trim_start_matches(BOM);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            let line = line.trim_end().replace(IDEOGRAPHIC_SPACE, " ");
            RE_SPACE_RUN.replace_all(&line, " ").into_owned()
        })
        .collect();

    lines.join("\n")
}
