//! The Signpost domain model: projects, pages, and page views.
//!
//! A [`Project`] binds a user's domain + path prefix to an opaque
//! `project_key` used in the public proxy URL. A [`Page`] is an authored
//! HTML document under a project, addressed by a path unique within it.
//! A [`PageView`] is an immutable record of one successful proxied access.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Prefix for generated project keys (e.g., `pk_3f2a...`).
pub const PROJECT_KEY_PREFIX: &str = "pk_";

/// Lifecycle status of a project. Only `active` projects resolve in the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Created but not yet verified against the user's site.
    Pending,
    /// Verified; resolvable through the proxy.
    Active,
    /// Deactivated by the owner; never served.
    Inactive,
}

impl ProjectStatus {
    /// Stable string form used in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(Error::InvalidField {
                field: "project status",
                reason: format!("unknown value '{other}'"),
            }),
        }
    }
}

/// Lifecycle status of a page. Only `published` pages resolve in the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Being authored; never served.
    Draft,
    /// Live; resolvable through the proxy.
    Published,
    /// Taken down by the author; never served.
    Offline,
}

impl PageStatus {
    /// Stable string form used in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for PageStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "offline" => Ok(Self::Offline),
            other => Err(Error::InvalidField {
                field: "page status",
                reason: format!("unknown value '{other}'"),
            }),
        }
    }
}

/// A registered domain + path prefix, addressed externally by `project_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Identity.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Lowercase host, unique per owner.
    pub domain: String,
    /// Leading-slash prefix under which pages are hosted (e.g., `/seo`).
    pub path_prefix: String,
    /// Opaque, globally unique token used in the public proxy URL.
    /// Immutable once assigned; never derivable from the domain.
    pub project_key: String,
    /// Lifecycle status; only `active` projects resolve.
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An authored HTML document belonging to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Identity.
    pub id: Uuid,
    /// Owning project; pages are cascade-deleted with it.
    pub project_id: Uuid,
    /// Leading-slash path, unique within the project.
    pub path: String,
    /// Page title, escaped into the document head.
    pub title: String,
    /// Raw HTML fragment. Author-controlled markup, injected verbatim.
    pub content: String,
    /// Plain-text meta description; empty means "emit no tag".
    pub meta_description: String,
    /// Plain-text meta keywords; empty means "emit no tag".
    pub meta_keywords: String,
    /// Lifecycle status; only `published` pages resolve.
    pub status: PageStatus,
    /// Denormalized view counter, eventually consistent with page_views.
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An immutable record of one successful proxied access to a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    /// Identity.
    pub id: Uuid,
    /// The viewed page; views are cascade-deleted with it.
    pub page_id: Uuid,
    pub viewed_at: DateTime<Utc>,
    /// Raw Referer header value, if any.
    pub referer: Option<String>,
    /// Raw User-Agent header value, if any.
    pub user_agent: Option<String>,
}

/// Input for creating a project. The store assigns id, key, and timestamps.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub user_id: Uuid,
    pub domain: String,
    pub path_prefix: String,
}

/// Input for creating a page. Pages start as drafts.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub project_id: Uuid,
    pub path: String,
    pub title: String,
    pub content: String,
    pub meta_description: String,
    pub meta_keywords: String,
}

/// Input for recording a page view.
#[derive(Debug, Clone)]
pub struct NewPageView {
    pub page_id: Uuid,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

/// Generate a fresh project key: `pk_` + 32 random hex chars.
///
/// The key is the sole external addressing token for the proxy path, so it
/// must be globally unique and not guessable from the domain.
pub fn generate_project_key() -> String {
    format!("{PROJECT_KEY_PREFIX}{}", Uuid::new_v4().simple())
}

static DOMAIN_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-z0-9][a-z0-9._-]+\.[a-z]{2,}$").unwrap());

/// Validate and canonicalize a domain: trimmed, lowercased hostname
/// with at least one dot-separated TLD of two or more letters.
pub fn validate_domain(domain: &str) -> Result<String> {
    let domain = domain.trim().to_lowercase();
    if DOMAIN_RE.is_match(&domain) {
        Ok(domain)
    } else {
        Err(Error::InvalidField {
            field: "domain",
            reason: format!("'{domain}' is not a valid domain (e.g., example.com)"),
        })
    }
}

/// Validate and canonicalize a path prefix: must start with `/` and keep at
/// least one segment after trailing slashes are trimmed.
pub fn validate_path_prefix(prefix: &str) -> Result<String> {
    let prefix = prefix.trim().trim_end_matches('/');
    if prefix.starts_with('/') && prefix.len() > 1 {
        Ok(prefix.to_string())
    } else {
        Err(Error::InvalidField {
            field: "path prefix",
            reason: format!("'{prefix}' must start with / and name a segment (e.g., /seo)"),
        })
    }
}

/// Normalize a request path to a leading-slash string. Empty normalizes to `/`.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return "/".to_string();
    }
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- status round-trips --

    #[test]
    fn project_status_roundtrip() {
        for status in [
            ProjectStatus::Pending,
            ProjectStatus::Active,
            ProjectStatus::Inactive,
        ] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
    }

    #[test]
    fn page_status_roundtrip() {
        for status in [PageStatus::Draft, PageStatus::Published, PageStatus::Offline] {
            assert_eq!(status.as_str().parse::<PageStatus>().unwrap(), status);
        }
    }

    #[test]
    fn project_status_unknown_rejected() {
        let err = "archived".parse::<ProjectStatus>().unwrap_err();
        assert!(err.to_string().contains("archived"));
    }

    #[test]
    fn page_status_unknown_rejected() {
        assert!("live".parse::<PageStatus>().is_err());
    }

    #[test]
    fn status_serde_lowercase() {
        let json = serde_json::to_string(&ProjectStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
        let json = serde_json::to_string(&PageStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
    }

    // -- generate_project_key() --

    #[test]
    fn project_key_shape() {
        let key = generate_project_key();
        assert!(key.starts_with(PROJECT_KEY_PREFIX));
        let hex = &key[PROJECT_KEY_PREFIX.len()..];
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn project_keys_are_unique() {
        let a = generate_project_key();
        let b = generate_project_key();
        assert_ne!(a, b);
    }

    // -- validate_domain() --

    #[test]
    fn domain_accepts_plain_hostname() {
        assert_eq!(validate_domain("example.com").unwrap(), "example.com");
    }

    #[test]
    fn domain_lowercases() {
        assert_eq!(validate_domain("Example.COM").unwrap(), "example.com");
    }

    #[test]
    fn domain_trims_whitespace() {
        assert_eq!(validate_domain("  example.com  ").unwrap(), "example.com");
    }

    #[test]
    fn domain_accepts_subdomains() {
        assert_eq!(
            validate_domain("docs.internal.example.co.uk").unwrap(),
            "docs.internal.example.co.uk"
        );
    }

    #[test]
    fn domain_rejects_missing_tld() {
        assert!(validate_domain("localhost").is_err());
    }

    #[test]
    fn domain_rejects_scheme() {
        assert!(validate_domain("https://example.com").is_err());
    }

    #[test]
    fn domain_rejects_empty() {
        assert!(validate_domain("").is_err());
    }

    #[test]
    fn domain_rejects_numeric_tld() {
        assert!(validate_domain("example.123").is_err());
    }

    // -- validate_path_prefix() --

    #[test]
    fn prefix_accepts_segment() {
        assert_eq!(validate_path_prefix("/seo").unwrap(), "/seo");
    }

    #[test]
    fn prefix_trims_trailing_slash() {
        assert_eq!(validate_path_prefix("/seo/").unwrap(), "/seo");
    }

    #[test]
    fn prefix_accepts_nested() {
        assert_eq!(validate_path_prefix("/content/seo").unwrap(), "/content/seo");
    }

    #[test]
    fn prefix_rejects_missing_slash() {
        assert!(validate_path_prefix("seo").is_err());
    }

    #[test]
    fn prefix_rejects_bare_root() {
        assert!(validate_path_prefix("/").is_err());
    }

    #[test]
    fn prefix_rejects_empty() {
        assert!(validate_path_prefix("").is_err());
    }

    // -- normalize_path() --

    #[test]
    fn path_empty_becomes_root() {
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn path_keeps_leading_slash() {
        assert_eq!(normalize_path("/intro"), "/intro");
    }

    #[test]
    fn path_adds_leading_slash() {
        assert_eq!(normalize_path("intro"), "/intro");
    }

    #[test]
    fn path_nested_segments() {
        assert_eq!(normalize_path("guides/pricing"), "/guides/pricing");
    }

    #[test]
    fn path_whitespace_only_becomes_root() {
        assert_eq!(normalize_path("   "), "/");
    }

    #[test]
    fn path_root_stays_root() {
        assert_eq!(normalize_path("/"), "/");
    }
}
