//! Bundle assembly: both catalogs -> one [`Bundle`], plus JSON round trip.

#[cfg(test)]
mod tests;

use crate::model::{ApiEntry, TypeDefinition};
use crate::parser::{parse_api_entries, parse_type_definitions, Diagnostic};
use crate::source::{read_document, InputUnavailable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Processing steps a complete bundle has been through
pub const CHECKLIST: [&str; 2] = ["parsed_api_doc", "parsed_api_arg"];

/// Parsed output of one method-catalog / type-catalog pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default = "default_checklist")]
    pub checklist: Vec<String>,
    #[serde(default)]
    pub type_definitions: Vec<TypeDefinition>,
    #[serde(default)]
    pub api_entries: Vec<ApiEntry>,
}

impl Default for Bundle {
    fn default() -> Self {
        Self {
            checklist: default_checklist(),
            type_definitions: Vec::new(),
            api_entries: Vec::new(),
        }
    }
}

fn default_checklist() -> Vec<String> {
    CHECKLIST.iter().map(|s| s.to_string()).collect()
}

impl Bundle {
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.type_definitions.iter().find(|t| t.name == name)
    }

    pub fn api_entry(&self, name: &str) -> Option<&ApiEntry> {
        self.api_entries.iter().find(|e| e.name == name)
    }

    /// Entry count per object, entries without an object under ""
    pub fn entries_per_object(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.api_entries {
            *counts.entry(entry.object_name.as_deref().unwrap_or_default()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize bundle")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize bundle")
    }
}

/// A bundle together with everything the parsers skipped on the way
#[derive(Debug, Clone)]
pub struct BundleReport {
    pub bundle: Bundle,
    /// Type catalog diagnostics first, then method catalog diagnostics
    pub diagnostics: Vec<Diagnostic>,
}

impl BundleReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Read and parse both catalogs.
///
/// The only failure is an unavailable input; everything the parsers cannot
/// read ends up in [`BundleReport::diagnostics`].
pub fn parse_documents(api_doc: &Path, api_arg: &Path) -> Result<BundleReport, InputUnavailable> {
    let api_text = read_document(api_doc)?;
    let arg_text = read_document(api_arg)?;

    Ok(parse_texts(
        &api_doc.to_string_lossy(),
        &api_text,
        &api_arg.to_string_lossy(),
        &arg_text,
    ))
}

/// Parse already decoded catalogs; type catalog first, then method catalog
pub fn parse_texts(api_doc_path: &str, api_text: &str, api_arg_path: &str, arg_text: &str) -> BundleReport {
    let types = parse_type_definitions(api_arg_path, arg_text);
    let entries = parse_api_entries(api_doc_path, api_text);

    let mut diagnostics = types.diagnostics;
    diagnostics.extend(entries.diagnostics);

    BundleReport {
        bundle: Bundle {
            checklist: default_checklist(),
            type_definitions: types.items,
            api_entries: entries.items,
        },
        diagnostics,
    }
}

/// Write a bundle as pretty JSON, creating parent directories
pub fn dump_bundle(bundle: &Bundle, path: &Path) -> Result<()> {
    write_json(bundle, path)
}

pub fn load_bundle(path: &Path) -> Result<Bundle> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bundle: {}", path.display()))?;
    Bundle::from_json(&json).with_context(|| format!("Invalid bundle: {}", path.display()))
}

/// Serialize any value as pretty JSON to `path`
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write file: {}", path.display()))?;
    log::debug!("[bundle] wrote {}", path.display());
    Ok(())
}
