//! Output module for harvested documents and run reports
//!
//! This module handles:
//! - Deriving a stable file name for each URL
//! - Assembling the YAML front matter and markdown body of a document
//! - Writing documents into the output directory
//! - Formatting the end-of-run summary

mod document;
mod filename;
mod summary;
mod writer;

pub use document::{
    assemble, assemble_at, parse_document, DocumentMetadata, SerializedDocument, UNTITLED,
};
pub use filename::{derive_filename, DOCUMENT_EXTENSION};
pub use summary::format_summary;
pub use writer::{ensure_output_dir, write_document};
