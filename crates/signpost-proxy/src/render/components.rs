//! Fixed stylesheets shared by the rendered documents.
//!
//! The page stylesheet is part of the serving contract: it is deterministic
//! and not configurable, so a page renders identically no matter which
//! deployment serves it.

/// Inline CSS for proxied SEO pages.
///
/// Readable single-column article layout for author-supplied markup:
/// headings, lists, code blocks, blockquotes, and tables.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,"Helvetica Neue",Arial,sans-serif;line-height:1.6;color:#333;max-width:800px;margin:0 auto;padding:2rem}
h1,h2,h3,h4,h5,h6{margin:1.5rem 0 1rem;line-height:1.3}
h1{font-size:2rem}
h2{font-size:1.5rem}
h3{font-size:1.25rem}
p{margin:1rem 0}
a{color:#2563eb;text-decoration:none}
a:hover{text-decoration:underline}
ul,ol{margin:1rem 0;padding-left:2rem}
li{margin:.5rem 0}
code{background:#f3f4f6;padding:.2rem .4rem;border-radius:.25rem;font-size:.875em}
pre{background:#1f2937;color:#f9fafb;padding:1rem;border-radius:.5rem;overflow-x:auto;margin:1rem 0}
pre code{background:none;padding:0}
blockquote{border-left:4px solid #e5e7eb;padding-left:1rem;margin:1rem 0;color:#6b7280}
img{max-width:100%;height:auto}
table{border-collapse:collapse;width:100%;margin:1rem 0}
th,td{border:1px solid #e5e7eb;padding:.75rem;text-align:left}
th{background:#f9fafb}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,"Helvetica Neue",Arial,sans-serif;display:flex;align-items:center;justify-content:center;min-height:100vh;margin:0;background:#f3f4f6}
.error{text-align:center;padding:2rem}
.error h1{color:#1f2937;margin-bottom:.5rem}
.error p{color:#6b7280}
"#;
