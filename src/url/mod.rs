//! URL handling module for Sitemap-Harvest
//!
//! Canonicalization gives every crawl target one stable string form, which
//! the output file naming is derived from.

mod normalize;

pub use normalize::{canonicalize_url, host_of};
