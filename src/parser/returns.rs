//! Return Type Guesser: coarse return type from the catalog's free text.

use crate::model::{ReturnSpec, VOID_TYPE};
use regex::Regex;
use std::sync::LazyLock;

pub const ID_TYPE: &str = "ID";
pub const UNKNOWN_RETURN_TYPE: &str = "unknown";

/// "none"
const NONE_MARKER: &str = "なし";
/// "なし" written as UTF-8 and read back as Shift_JIS, as found in some
/// exported catalogs. Kept as a separate literal check.
const NONE_MARKER_GARBLED: &str = "縺ｪ縺";
const ELEMENT_ID: &str = "要素ID";
const ARRAY_MARKER: &str = "配列";

static RE_ID_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bID\b").unwrap());

/// True when the text states that nothing is returned
pub fn denotes_none(desc: &str) -> bool {
    desc.contains(NONE_MARKER) || desc.contains(NONE_MARKER_GARBLED)
}

pub fn guess_return_type(desc: &str) -> &'static str {
    if desc.trim().is_empty() || denotes_none(desc) {
        return VOID_TYPE;
    }
    if RE_ID_TOKEN.is_match(desc) || desc.contains(ELEMENT_ID) {
        return ID_TYPE;
    }
    UNKNOWN_RETURN_TYPE
}

pub fn guess_return_is_array(desc: &str) -> bool {
    desc.contains(ARRAY_MARKER)
}

/// Build the return spec for a method from its raw `返り値` text
pub fn build_return(raw: &str) -> ReturnSpec {
    let raw = raw.trim();
    ReturnSpec {
        type_name: guess_return_type(raw).to_string(),
        description: raw.to_string(),
        is_array: guess_return_is_array(raw),
        raw_type: None,
        void_locked: !raw.is_empty() && denotes_none(raw),
    }
}
