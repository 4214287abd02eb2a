use crate::source::SourceFragment;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ENTRY_TYPE_FUNCTION: &str = "function";
pub const STATUS_IMPLEMENTED: &str = "implemented";
pub const VOID_TYPE: &str = "void";

/// Coordinate dimension attached to a parameter type, e.g. `点(2D)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoD => "2D",
            Self::ThreeD => "3D",
        }
    }

    /// Number of coordinate components
    pub fn components(&self) -> usize {
        match self {
            Self::TwoD => 2,
            Self::ThreeD => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positional argument of a method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Normalized type: base name, then optional `(2D)`/`(3D)`, then optional `[]`
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// 0-based, contiguous within an entry
    #[serde(default)]
    pub position: usize,
    /// Type text as written in the catalog, before cleanup
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
}

impl Parameter {
    /// Type without dimension tag or array marker
    pub fn base_type(&self) -> &str {
        let base = self.type_name.strip_suffix("[]").unwrap_or(&self.type_name);
        match self.dimension {
            Some(dim) => base
                .strip_suffix(&format!("({})", dim))
                .unwrap_or(base),
            None => base,
        }
    }

    pub fn is_array(&self) -> bool {
        self.type_name.ends_with("[]")
    }
}

/// What a method gives back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnSpec {
    #[serde(rename = "type", default = "default_return_type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_type: Option<String>,
    /// Set once the catalog states the method returns nothing; the type then
    /// stays `void` whatever enrichment suggests.
    #[serde(default, skip_serializing_if = "is_false")]
    pub void_locked: bool,
}

impl ReturnSpec {
    pub fn is_void(&self) -> bool {
        self.type_name == VOID_TYPE
    }
}

impl Default for ReturnSpec {
    fn default() -> Self {
        Self {
            type_name: default_return_type(),
            description: String::new(),
            is_array: false,
            raw_type: None,
            void_locked: false,
        }
    }
}

/// A documented method of the scripting API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEntry {
    #[serde(default = "default_entry_type")]
    pub entry_type: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    /// Reserved for property-style entries; never filled by the parser
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Parameter>,
    #[serde(default)]
    pub returns: ReturnSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_status")]
    pub implementation_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(default, alias = "title_jp", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_return: Option<String>,
    #[serde(default, skip_serializing_if = "SourceFragment::is_empty")]
    pub source: SourceFragment,
}

impl ApiEntry {
    /// A function entry with default status and empty context
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            entry_type: default_entry_type(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            params: Vec::new(),
            properties: Vec::new(),
            returns: ReturnSpec::default(),
            notes: None,
            implementation_status: default_status(),
            object_name: None,
            title: None,
            raw_return: None,
            source: SourceFragment::default(),
        }
    }

    /// Check the `params[i].position == i` invariant
    pub fn positions_are_contiguous(&self) -> bool {
        self.params
            .iter()
            .enumerate()
            .all(|(i, p)| p.position == i)
    }
}

fn default_return_type() -> String {
    VOID_TYPE.to_string()
}

fn default_entry_type() -> String {
    ENTRY_TYPE_FUNCTION.to_string()
}

fn default_status() -> String {
    STATUS_IMPLEMENTED.to_string()
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
