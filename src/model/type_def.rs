use crate::source::SourceFragment;
use serde::{Deserialize, Serialize};

/// A value type described in the type catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Localized type name, unique within a bundle (e.g. "長さ", "点(2D)")
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    /// Normalized identifier from the static table (e.g. "length")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_type: Option<String>,
    /// Scripting-language type hint (e.g. "str", "int")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub py_type: Option<String>,
    /// Alternative concrete representations a value may take
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "SourceFragment::is_empty")]
    pub source: SourceFragment,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Whether this is one of the derived `(2D)`/`(3D)` variants
    pub fn is_dimension_variant(&self) -> bool {
        self.name.ends_with("(2D)") || self.name.ends_with("(3D)")
    }
}
