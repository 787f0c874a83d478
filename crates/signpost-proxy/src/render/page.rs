//! Renderer for the canonical SEO page document.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use signpost_core::Page;

use super::components::PAGE_CSS;

/// The externally-visible URL a rendered page declares as authoritative for
/// search indexing: `https://{domain}{path_prefix}{page.path}`.
pub fn canonical_url(domain: &str, path_prefix: &str, path: &str) -> String {
    format!("https://{domain}{path_prefix}{path}")
}

/// Render a page into a complete, self-contained HTML document.
///
/// The head carries the escaped title, optional description/keywords meta
/// tags (omitted entirely when the source field is empty), the canonical
/// link, and Open Graph / Twitter Card tags mirroring title and description.
/// The body is the author's `content` injected verbatim inside an
/// `<article>` wrapper — trusted markup, intentionally unescaped.
pub fn page_document(page: &Page, canonical_url: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page.title) }
                @if !page.meta_description.is_empty() {
                    meta name="description" content=(page.meta_description);
                }
                @if !page.meta_keywords.is_empty() {
                    meta name="keywords" content=(page.meta_keywords);
                }
                link rel="canonical" href=(canonical_url);

                // Open Graph
                meta property="og:title" content=(page.title);
                @if !page.meta_description.is_empty() {
                    meta property="og:description" content=(page.meta_description);
                }
                meta property="og:url" content=(canonical_url);
                meta property="og:type" content="website";

                // Twitter Card
                meta name="twitter:card" content="summary";
                meta name="twitter:title" content=(page.title);
                @if !page.meta_description.is_empty() {
                    meta name="twitter:description" content=(page.meta_description);
                }

                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                article { (PreEscaped(page.content.as_str())) }
            }
        }
    }
}
