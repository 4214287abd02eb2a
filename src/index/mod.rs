mod chunks;
mod graph;

#[cfg(test)]
mod tests;

pub use chunks::{vector_chunks, VectorChunk};
pub use graph::{build_graph_payload, GraphNode, GraphPayload, GraphRelationship, NodeLabel, RelationshipType};

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Maximum parameters listed in one vector chunk
pub const VECTOR_PARAM_LIMIT: usize = 6;

/// Placeholder for parameters without a description
pub const FALLBACK_PARAM_DESCRIPTION: &str = "No description provided";

/// Write vector chunks as JSON Lines, one record per line
pub fn write_chunks(chunks: &[VectorChunk], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for chunk in chunks {
        let line = serde_json::to_string(chunk).context("Failed to serialize vector chunk")?;
        writeln!(writer, "{}", line).context("Failed to write vector chunk")?;
    }
    writer.flush().context("Failed to flush vector chunks")?;

    log::debug!("[index] wrote {} chunks to {}", chunks.len(), path.display());
    Ok(())
}
