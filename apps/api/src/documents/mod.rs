//! Résumé text extraction for PDF and Word uploads.

pub mod cache;
pub mod extract;

pub use cache::ExtractionCache;
pub use extract::ExtractError;
