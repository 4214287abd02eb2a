use super::{FALLBACK_PARAM_DESCRIPTION, VECTOR_PARAM_LIMIT};
use crate::model::ApiEntry;
use serde::{Deserialize, Serialize};

/// One embedding record per API entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorChunk {
    /// Method name
    pub id: String,
    pub object: Option<String>,
    pub title: Option<String>,
    pub content: String,
    /// Checksum of the entry's source fragment; absent for hand-built entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

pub fn vector_chunks(entries: &[ApiEntry]) -> Vec<VectorChunk> {
    let chunks: Vec<VectorChunk> = entries.iter().map(chunk_entry).collect();
    log::info!("[index] generated {} vector chunks", chunks.len());
    chunks
}

fn chunk_entry(entry: &ApiEntry) -> VectorChunk {
    let mut parts = Vec::new();
    if !entry.description.is_empty() {
        parts.push(format!("Description: {}", entry.description));
    }
    if !entry.category.is_empty() {
        parts.push(format!("Category: {}", entry.category));
    }
    if !entry.returns.description.is_empty() {
        parts.push(format!("Return: {}", entry.returns.description));
    }

    for param in entry.params.iter().take(VECTOR_PARAM_LIMIT) {
        let description = match param.description.trim() {
            "" => FALLBACK_PARAM_DESCRIPTION,
            d => d,
        };
        parts.push(format!("- {} ({}): {}", param.name, param.type_name, description));
    }
    if entry.params.len() > VECTOR_PARAM_LIMIT {
        parts.push(format!(
            "... ({} more parameters)",
            entry.params.len() - VECTOR_PARAM_LIMIT
        ));
    }

    VectorChunk {
        id: entry.name.clone(),
        object: entry.object_name.clone(),
        title: entry.title.clone(),
        content: parts.join("\n"),
        checksum: (!entry.source.is_empty()).then(|| entry.source.checksum.clone()),
    }
}
