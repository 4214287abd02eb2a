//! Patching parsed entries with hints from an external model.
//!
//! The model itself is out of reach of this crate; callers send
//! [`doc_snippet`] plus the entry JSON, then feed the reply back through
//! [`EnrichmentPatch::from_json`] and [`apply_enrichment`].

use crate::model::ApiEntry;
use crate::parser::returns::UNKNOWN_RETURN_TYPE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const NO_PARAM_DESCRIPTION: &str = "説明なし";

/// True when the entry has gaps an enrichment pass could fill
pub fn needs_enrichment(entry: &ApiEntry) -> bool {
    if entry.description.is_empty() {
        return true;
    }
    let has_raw_return = entry.raw_return.as_deref().is_some_and(|r| !r.is_empty());
    if has_raw_return && entry.returns.type_name == UNKNOWN_RETURN_TYPE {
        return true;
    }
    entry.params.iter().any(|p| p.description.is_empty())
}

/// Compact catalog context for one entry
pub fn doc_snippet(entry: &ApiEntry) -> String {
    let mut lines = Vec::new();
    if let Some(title) = entry.title.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("タイトル: {}", title));
    }
    if let Some(raw) = entry.raw_return.as_deref().filter(|r| !r.is_empty()) {
        lines.push(format!("返り値: {}", raw));
    }
    for param in &entry.params {
        let description = if param.description.is_empty() {
            NO_PARAM_DESCRIPTION
        } else {
            &param.description
        };
        lines.push(format!("引数 {}: {}", param.name, description));
    }
    lines.join("\n")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnPatch {
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_array: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterPatch {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
}

/// Suggested changes for one entry, as returned by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentPatch {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub returns: Option<ReturnPatch>,
    #[serde(default)]
    pub params: Vec<ParameterPatch>,
}

impl EnrichmentPatch {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse enrichment reply")
    }
}

/// What [`apply_enrichment`] did with a patch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentOutcome {
    /// Fields that changed, e.g. `description`, `returns.type`, `params.Depth.description`
    pub updated: Vec<String>,
    /// Suggestions refused because the return type is locked to void
    pub refused: Vec<String>,
    /// Parameter names in the patch that the entry does not have
    pub unmatched_params: Vec<String>,
}

impl EnrichmentOutcome {
    pub fn changed(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// Non-empty trimmed text
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Apply a patch in place; a void-locked return keeps its type and array flag.
pub fn apply_enrichment(entry: &mut ApiEntry, patch: &EnrichmentPatch) -> EnrichmentOutcome {
    let mut outcome = EnrichmentOutcome::default();

    if let Some(description) = text(&patch.description) {
        entry.description = description.to_string();
        outcome.updated.push("description".to_string());
    }

    if let Some(returns) = &patch.returns {
        apply_return_patch(entry, returns, &mut outcome);
    }

    for update in &patch.params {
        let Some(param) = entry.params.iter_mut().find(|p| p.name == update.name) else {
            outcome.unmatched_params.push(update.name.clone());
            continue;
        };
        if let Some(description) = text(&update.description) {
            param.description = description.to_string();
            outcome.updated.push(format!("params.{}.description", param.name));
        }
        if let Some(type_name) = text(&update.type_name) {
            if param.raw_type.is_empty() {
                param.raw_type = type_name.to_string();
            }
            param.type_name = type_name.to_string();
            outcome.updated.push(format!("params.{}.type", param.name));
        }
    }

    if outcome.changed() {
        log::debug!("[enrich] {}: updated {}", entry.name, outcome.updated.join(", "));
    }
    if !outcome.refused.is_empty() {
        log::warn!("[enrich] {}: refused {} (return is void)", entry.name, outcome.refused.join(", "));
    }
    outcome
}

fn apply_return_patch(entry: &mut ApiEntry, patch: &ReturnPatch, outcome: &mut EnrichmentOutcome) {
    let target = &mut entry.returns;

    if let Some(type_name) = text(&patch.type_name) {
        if target.void_locked && type_name != target.type_name {
            outcome.refused.push("returns.type".to_string());
        } else if type_name != target.type_name {
            target.type_name = type_name.to_string();
            outcome.updated.push("returns.type".to_string());
        }
    }

    if let Some(description) = patch.description.as_deref() {
        let description = description.trim();
        if description != target.description {
            target.description = description.to_string();
            outcome.updated.push("returns.description".to_string());
        }
    }

    if let Some(is_array) = patch.is_array {
        if target.void_locked && is_array {
            outcome.refused.push("returns.is_array".to_string());
        } else if is_array != target.is_array {
            target.is_array = is_array;
            outcome.updated.push("returns.is_array".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::parse_texts;
    use crate::model::VOID_TYPE;

    const API_DOC: &str = "\
■シートのメソッド
〇シートを削除
返り値：なし
DeleteSheet(
  Sheet, // 要素：削除するシート
  Force) // bool
〇名前を取得
返り値：シート名の一覧
GetNames()
";

    fn entries() -> Vec<ApiEntry> {
        parse_texts("api.txt", API_DOC, "api_arg.txt", "").bundle.api_entries
    }

    #[test]
    fn test_needs_enrichment() {
        let entries = entries();
        // Force has no description
        assert!(needs_enrichment(&entries[0]));
        // Unknown return with raw text
        assert_eq!(entries[1].returns.type_name, UNKNOWN_RETURN_TYPE);
        assert!(needs_enrichment(&entries[1]));

        let mut complete = entries[0].clone();
        complete.params[1].description = "強制".to_string();
        assert!(complete.returns.void_locked);
        assert!(!needs_enrichment(&complete));

        let mut untitled = complete.clone();
        untitled.description.clear();
        assert!(needs_enrichment(&untitled));
    }

    #[test]
    fn test_doc_snippet() {
        let snippet = doc_snippet(&entries()[0]);
        assert_eq!(
            snippet,
            "タイトル: シートを削除\n返り値: なし\n引数 Sheet: 削除するシート\n引数 Force: 説明なし"
        );
    }

    #[test]
    fn test_apply_updates_fields() {
        let mut entry = entries().remove(1);
        let patch = EnrichmentPatch::from_json(
            r#"{"description": " シート名を取得する ", "returns": {"type": "文字列", "is_array": true}}"#,
        )
        .unwrap();

        let outcome = apply_enrichment(&mut entry, &patch);
        assert_eq!(entry.description, "シート名を取得する");
        assert_eq!(entry.returns.type_name, "文字列");
        assert!(entry.returns.is_array);
        assert_eq!(outcome.updated, vec!["description", "returns.type", "returns.is_array"]);
        assert!(outcome.refused.is_empty());
    }

    #[test]
    fn test_void_locked_return_is_kept() {
        let mut entry = entries().remove(0);
        assert!(entry.returns.void_locked);

        let patch = EnrichmentPatch {
            returns: Some(ReturnPatch {
                type_name: Some("ID".to_string()),
                description: Some("なし".to_string()),
                is_array: Some(true),
            }),
            ..EnrichmentPatch::default()
        };
        let outcome = apply_enrichment(&mut entry, &patch);

        assert_eq!(entry.returns.type_name, VOID_TYPE);
        assert!(!entry.returns.is_array);
        assert_eq!(outcome.refused, vec!["returns.type", "returns.is_array"]);
        assert!(!outcome.changed());
    }

    #[test]
    fn test_param_patches_by_name() {
        let mut entry = entries().remove(0);
        let patch = EnrichmentPatch::from_json(
            r#"{"params": [
                {"name": "Force", "description": "確認せずに削除", "type": "bool"},
                {"name": "Missing", "description": "x"}
            ]}"#,
        )
        .unwrap();

        let outcome = apply_enrichment(&mut entry, &patch);
        assert_eq!(entry.params[1].description, "確認せずに削除");
        assert_eq!(entry.params[1].raw_type, "bool");
        assert_eq!(outcome.unmatched_params, vec!["Missing"]);
        assert_eq!(entry.params.len(), 2);
    }

    #[test]
    fn test_invalid_reply_is_an_error() {
        assert!(EnrichmentPatch::from_json("not json").is_err());
    }
}
