//! Parameter Builder: one raw (name, type, description) triple -> [`Parameter`].

use crate::model::{Dimension, Parameter};
use regex::Regex;
use std::sync::LazyLock;

/// Surface forms that mark a type as an array
const ARRAY_MARKERS: [&str; 4] = ["(配列)", "（配列）", "[]", "(array)"];

/// Legacy interop spellings of the string type
const LEGACY_STRING_TYPES: [&str; 3] = ["BSTR", "LPWSTR", "LPSTR"];

/// Placeholder type for parameters written without one
pub const UNKNOWN_TYPE: &str = "unknown";

// `[in]`, `[out]`, `[in, optional]`... but not the `[]` array marker
static RE_INTEROP_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]").unwrap());

static RE_TRAILING_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[(（]([^()（）]*)[)）]$").unwrap());

/// A raw type reduced to its localized base name plus markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanType {
    pub name: String,
    pub is_array: bool,
    pub dimension: Option<Dimension>,
}

impl CleanType {
    /// `<name>[(dimension)][[]]`
    pub fn render(&self) -> String {
        let mut rendered = self.name.clone();
        if let Some(dim) = self.dimension {
            rendered.push_str(&format!("({})", dim));
        }
        if self.is_array {
            rendered.push_str("[]");
        }
        rendered
    }
}

/// Map lowercase English type tokens to the catalog's localized names
fn localize(name: &str) -> Option<&'static str> {
    let localized = match name.to_lowercase().as_str() {
        "string" | "text" | "str" => "文字列",
        "float" | "double" | "number" => "浮動小数点",
        "int" | "integer" => "整数",
        "bool" | "boolean" | "真偽値" | "論理値" => "bool",
        _ => return None,
    };
    Some(localized)
}

fn parse_dimension(tag: &str) -> Option<Dimension> {
    match tag.trim() {
        "2D" | "2d" => Some(Dimension::TwoD),
        "3D" | "3d" => Some(Dimension::ThreeD),
        _ => None,
    }
}

/// Strip qualifiers and markers from a raw type, recording what was removed.
///
/// Idempotent: cleaning `clean_type(x).render()` again yields the same value.
pub fn clean_type(raw: &str) -> CleanType {
    let mut name = RE_INTEROP_QUALIFIER.replace_all(raw.trim(), "").trim().to_string();
    for legacy in LEGACY_STRING_TYPES {
        name = name.replace(legacy, "string");
    }

    let mut is_array = false;
    for marker in ARRAY_MARKERS {
        if name.contains(marker) {
            is_array = true;
            name = name.replace(marker, "");
        }
    }
    let mut name = name.trim().to_string();

    // Trailing notes such as "(2D)" or "(mm)"; only the dimension survives
    let mut dimension = None;
    while let Some(caps) = RE_TRAILING_PAREN.captures(&name) {
        let (start, inner) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(inner)) => (whole.start(), inner.as_str()),
            _ => break,
        };
        if start == 0 {
            break;
        }
        if dimension.is_none() {
            dimension = parse_dimension(inner);
        }
        name.truncate(start);
        name = name.trim_end().to_string();
    }

    if let Some(localized) = localize(&name) {
        name = localized.to_string();
    }

    CleanType {
        name,
        is_array,
        dimension,
    }
}

/// Required iff the description says it may not be blank
pub fn is_required(description: &str) -> bool {
    if description.contains("空欄不可") || description.contains("必須") {
        return true;
    }
    if description.contains("空欄可") || description.contains("任意") {
        return false;
    }
    false
}

/// Build a typed parameter at `position` from its raw parts
pub fn build_parameter(name: &str, raw_type: &str, description: &str, position: usize) -> Parameter {
    let mut cleaned = clean_type(raw_type);
    if cleaned.name.is_empty() {
        cleaned.name = UNKNOWN_TYPE.to_string();
    }

    Parameter {
        name: name.trim().to_string(),
        type_name: cleaned.render(),
        description: description.trim().to_string(),
        is_required: is_required(description),
        default_value: None,
        position,
        raw_type: raw_type.trim().to_string(),
        dimension: cleaned.dimension,
    }
}
