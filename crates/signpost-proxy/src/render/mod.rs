//! HTML rendering for proxied SEO pages.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic XSS protection: every value interpolated into
//! the document head or an attribute is escaped. The one deliberate
//! exception is the page body, which is author-controlled markup injected
//! verbatim.
//!
//! Rendering is a pure function of its inputs: no timestamps, no randomness,
//! byte-identical output for identical pages.

pub mod components;
mod error_page;
mod page;

pub use error_page::error_document;
pub use page::{canonical_url, page_document};
