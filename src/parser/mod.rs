pub mod api;
pub mod params;
pub mod returns;
pub mod types;
mod result;


pub use api::{parse_api_entries, ApiCatalogParser};
pub use params::{build_parameter, clean_type, is_required, CleanType};
pub use result::{Diagnostic, Parsed, SkipReason};
pub use returns::{build_return, guess_return_is_array, guess_return_type};
pub use types::{build_point_variants, extract_point_examples, parse_type_definitions, TypeCatalogParser};

/// Core trait that both catalog parsers implement
pub trait CatalogParser: Send + Sync {
    /// Record type produced from one document
    type Item;

    /// Parse one catalog document
    ///
    /// # Arguments
    /// * `path` - Document path, recorded in source fragments and diagnostics
    /// * `text` - Decoded document text; normalized by the parser
    ///
    /// # Returns
    /// Records in document order plus diagnostics for skipped fragments
    fn parse(&self, path: &str, text: &str) -> Parsed<Self::Item>;
}
