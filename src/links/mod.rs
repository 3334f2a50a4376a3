//! Link extraction from free text or link files.

pub mod extractor;

pub use extractor::{extract_from_text, extract_links, SUPPORTED_FORMATS};
