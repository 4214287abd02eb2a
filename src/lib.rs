// Public API exports
pub mod bundle;
pub mod config;
pub mod enrich;
pub mod index;
pub mod model;
pub mod parser;
pub mod source;

// Re-export main types for convenience
pub use source::{checksum, normalize_text, read_document, InputUnavailable, SourceFragment};

pub use model::{ApiEntry, Dimension, Parameter, ReturnSpec, TypeDefinition};

pub use parser::{
    parse_api_entries, parse_type_definitions, ApiCatalogParser, CatalogParser, Diagnostic,
    Parsed, SkipReason, TypeCatalogParser,
};

pub use bundle::{dump_bundle, load_bundle, parse_documents, parse_texts, Bundle, BundleReport, CHECKLIST};

pub use index::{build_graph_payload, vector_chunks, GraphPayload, VectorChunk};

pub use enrich::{apply_enrichment, needs_enrichment, EnrichmentOutcome, EnrichmentPatch};

pub use config::PipelineConfig;
