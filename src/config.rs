//! Pipeline configuration: input documents and the output directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_DOC: &str = "data/src/api.txt";
pub const DEFAULT_API_ARG: &str = "data/src/api_arg.txt";
pub const DEFAULT_OUTPUT_DIR: &str = "out";

const STRUCTURED_OUTPUT: &str = "structured_api.json";
const GRAPH_OUTPUT: &str = "graph_payload.json";
const VECTOR_OUTPUT: &str = "vector_chunks.jsonl";
const DIAGNOSTICS_OUTPUT: &str = "diagnostics.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Method catalog
    pub api_doc_path: PathBuf,
    /// Type catalog
    pub api_arg_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_doc_path: PathBuf::from(DEFAULT_API_DOC),
            api_arg_path: PathBuf::from(DEFAULT_API_ARG),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        log::debug!("[config] loaded {}", path.display());
        Ok(config)
    }

    /// Replace the paths that were given explicitly
    pub fn with_overrides(
        mut self,
        api_doc_path: Option<PathBuf>,
        api_arg_path: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = api_doc_path {
            self.api_doc_path = path;
        }
        if let Some(path) = api_arg_path {
            self.api_arg_path = path;
        }
        if let Some(path) = output_dir {
            self.output_dir = path;
        }
        self
    }

    pub fn structured_output(&self) -> PathBuf {
        self.output_dir.join(STRUCTURED_OUTPUT)
    }

    pub fn graph_output(&self) -> PathBuf {
        self.output_dir.join(GRAPH_OUTPUT)
    }

    pub fn vector_output(&self) -> PathBuf {
        self.output_dir.join(VECTOR_OUTPUT)
    }

    pub fn diagnostics_output(&self) -> PathBuf {
        self.output_dir.join(DIAGNOSTICS_OUTPUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_and_derived_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.api_doc_path, PathBuf::from("data/src/api.txt"));
        assert_eq!(config.structured_output(), PathBuf::from("out/structured_api.json"));
        assert_eq!(config.graph_output(), PathBuf::from("out/graph_payload.json"));
        assert_eq!(config.vector_output(), PathBuf::from("out/vector_chunks.jsonl"));
        assert_eq!(config.diagnostics_output(), PathBuf::from("out/diagnostics.json"));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"output_dir": "build/bundle"}"#).unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("build/bundle"));
        assert_eq!(config.api_arg_path, PathBuf::from(DEFAULT_API_ARG));
    }

    #[test]
    fn test_from_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(PipelineConfig::from_file(&dir.path().join("missing.json")).is_err());

        let path = dir.path().join("bad.json");
        fs::write(&path, "{").unwrap();
        let err = PipelineConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
    }

    #[test]
    fn test_overrides() {
        let config = PipelineConfig::default().with_overrides(
            Some(PathBuf::from("a.txt")),
            None,
            Some(PathBuf::from("dist")),
        );
        assert_eq!(config.api_doc_path, PathBuf::from("a.txt"));
        assert_eq!(config.api_arg_path, PathBuf::from(DEFAULT_API_ARG));
        assert_eq!(config.output_dir, PathBuf::from("dist"));
    }
}
