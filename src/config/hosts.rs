//
//  bitbucket-checkout
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Utilities
//!
//! Constants for the well-known Bitbucket Cloud hostnames and helpers to
//! tell Cloud from self-hosted Server/Data Center instances.
//!
//! ## Bitbucket Cloud vs Server/Data Center
//!
//! | Feature | Cloud | Server/DC |
//! |---------|-------|-----------|
//! | Hostname | `bitbucket.org` | Custom (e.g., `bitbucket.company.com`) |
//! | Clone path | `/{workspace}/{repo}.git` | `/scm/{project}/{repo}.git` |
//! | SSH form | `git@bitbucket.org:...` | `ssh://git@host:port/...` |
//! | Mercurial | Yes | No |
//!
//! ## Usage
//!
//! ```rust
//! use bitbucket_checkout::config::{is_cloud_host, normalize_host};
//!
//! assert!(is_cloud_host("bitbucket.org"));
//! assert!(!is_cloud_host("bitbucket.company.com"));
//!
//! let host = normalize_host("https://BITBUCKET.ORG/");
//! assert_eq!(host, "bitbucket.org");
//! ```

/// The primary hostname for Bitbucket Cloud.
///
/// # Examples
///
/// ```rust
/// use bitbucket_checkout::config::BITBUCKET_CLOUD;
///
/// let url = format!("https://{}/workspace/repo", BITBUCKET_CLOUD);
/// assert_eq!(url, "https://bitbucket.org/workspace/repo");
/// ```
pub const BITBUCKET_CLOUD: &str = "bitbucket.org";

/// The API hostname for Bitbucket Cloud.
///
/// Users sometimes pass it as `--host`; it still means Cloud.
pub const BITBUCKET_API: &str = "api.bitbucket.org";

/// Web root of Bitbucket Cloud.
///
/// Returned in place of clone URLs while a builder has no clone links yet.
pub const CLOUD_ROOT_URL: &str = "https://bitbucket.org";

/// Checks if a hostname corresponds to Bitbucket Cloud.
///
/// # Parameters
///
/// * `host` - The hostname to check (should be normalized, without protocol)
///
/// # Returns
///
/// - `true` - The host is Bitbucket Cloud (bitbucket.org or api.bitbucket.org)
/// - `false` - The host is not Bitbucket Cloud (likely Server/DC)
///
/// # Examples
///
/// ```rust
/// use bitbucket_checkout::config::is_cloud_host;
///
/// assert!(is_cloud_host("bitbucket.org"));
/// assert!(is_cloud_host("api.bitbucket.org"));
/// assert!(!is_cloud_host("git.internal.net"));
/// ```
///
/// # Notes
///
/// - Comparison is exact; use [`normalize_host`] first for user input
/// - Only matches the two known Cloud hostnames; subdomains return `false`
pub fn is_cloud_host(host: &str) -> bool {
    host == BITBUCKET_CLOUD || host == BITBUCKET_API
}

/// Normalizes a host URL to a consistent hostname format.
///
/// Removes protocol prefixes and a trailing slash, trims whitespace and
/// lowercases the rest.
///
/// # Examples
///
/// ```rust
/// use bitbucket_checkout::config::normalize_host;
///
/// assert_eq!(normalize_host("https://bitbucket.org"), "bitbucket.org");
/// assert_eq!(normalize_host("http://bitbucket.org"), "bitbucket.org");
/// assert_eq!(normalize_host("bitbucket.org/"), "bitbucket.org");
/// assert_eq!(normalize_host("  HTTPS://BitBucket.Org/  "), "bitbucket.org");
/// ```
///
/// # Notes
///
/// - Does not validate that the result is a valid hostname
/// - Port numbers stay in the output
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.strip_suffix('/').unwrap_or(host);
    host.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cloud_host() {
        assert!(is_cloud_host(BITBUCKET_CLOUD));
        assert!(is_cloud_host(BITBUCKET_API));
        assert!(!is_cloud_host("bitbucket.org.evil.com"));
        assert!(!is_cloud_host("BITBUCKET.ORG"));
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("https://bitbucket.test:8443/"), "bitbucket.test:8443");
        assert!(is_cloud_host(&normalize_host(" https://Bitbucket.org/ ")));
    }

    #[test]
    fn test_cloud_root_url_matches_host() {
        assert_eq!(CLOUD_ROOT_URL, format!("https://{}", BITBUCKET_CLOUD));
    }
}
