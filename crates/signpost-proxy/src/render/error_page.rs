//! Renderer for the error document shown on failed resolutions.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::components::ERROR_CSS;

/// Render a minimal centered-message error page.
///
/// Used for both "project not found" and "page not found" with different
/// copy, so visitors of the proxied domain see branded content rather than a
/// bare status code. Same escaping rule as the page document: title and
/// message are always escaped.
pub fn error_document(title: &str, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(ERROR_CSS)) }
            }
            body {
                div class="error" {
                    h1 { (title) }
                    p { (message) }
                }
            }
        }
    }
}
