//
//  bitbucket-checkout
//  scm/clone_url.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Clone Links and Clone URLs
//!
//! Bitbucket reports clone links per repository and per protocol. A builder
//! receives the links of the source repository and derives every remote URL
//! it needs from them, including URLs of forks the API has not described.
//!
//! ## Supported URL Formats
//!
//! - URL form: `https://bitbucket.org/owner/repo.git`,
//!   `ssh://git@bitbucket.example.com:7999/PROJ/repo.git`
//! - SCP-like form: `git@bitbucket.org:owner/repo.git`
//!
//! Rewriting a URL to another repository substitutes the last two path
//! segments and keeps everything else: scheme, user, host, port, any context
//! path in front of the owner, and the `.git` suffix convention.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{BackendType, CheckoutError, Deployment, RepositoryUriResolver, TransportProtocol};

/// Regular expression pattern for SCP-like clone URLs.
///
/// Matches URLs in the format: `[user@]host:path`
///
/// # Capture Groups
/// 1. User (optional, e.g. "git")
/// 2. Host (e.g. "bitbucket.org")
/// 3. Path (e.g. "owner/repo.git")
static SCP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([^@/:]+)@)?([^@/:]+):(.+)$").unwrap()
});

const GIT_SUFFIX: &str = ".git";

/// One clone URL of one repository, as reported by the Bitbucket API.
///
/// Deserializes from the API's clone link shape:
///
/// ```rust
/// use bitbucket_checkout::scm::{CloneLinkTemplate, TransportProtocol};
///
/// let link: CloneLinkTemplate = serde_json::from_str(
///     r#"{"href": "https://bitbucket.example.com/scm/PROJ/repo.git", "name": "http"}"#,
/// ).unwrap();
/// assert_eq!(link.protocol, TransportProtocol::Https);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CloneLinkTemplate {
    /// Protocol of the URL
    #[serde(rename = "name")]
    pub protocol: TransportProtocol,
    /// The clone URL itself
    #[serde(rename = "href")]
    pub url: String,
}

impl CloneLinkTemplate {
    /// Creates an HTTPS template.
    pub fn https(url: impl Into<String>) -> Self {
        Self {
            protocol: TransportProtocol::Https,
            url: url.into(),
        }
    }

    /// Creates an SSH template.
    pub fn ssh(url: impl Into<String>) -> Self {
        Self {
            protocol: TransportProtocol::Ssh,
            url: url.into(),
        }
    }
}

/// The clone link templates of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloneLinks {
    templates: Vec<CloneLinkTemplate>,
}

impl CloneLinks {
    /// Collects templates, keeping their order.
    pub fn new(templates: impl IntoIterator<Item = CloneLinkTemplate>) -> Self {
        Self {
            templates: templates.into_iter().collect(),
        }
    }

    /// Builds HTTPS and SSH templates from the [`RepositoryUriResolver`].
    ///
    /// Used when the API has not been queried yet, or has not described the
    /// repository.
    ///
    /// # Errors
    ///
    /// Propagates resolver errors, e.g. Mercurial on Server.
    pub fn fallback(
        owner: &str,
        repository: &str,
        backend: BackendType,
        deployment: &Deployment,
    ) -> Result<Self, CheckoutError> {
        let resolver = RepositoryUriResolver::new(backend, deployment);
        Ok(Self::new([
            CloneLinkTemplate::https(resolver.resolve(owner, repository, TransportProtocol::Https)?),
            CloneLinkTemplate::ssh(resolver.resolve(owner, repository, TransportProtocol::Ssh)?),
        ]))
    }

    /// Returns all templates.
    pub fn templates(&self) -> &[CloneLinkTemplate] {
        &self.templates
    }

    /// Returns the first template for `protocol`.
    pub fn find(&self, protocol: TransportProtocol) -> Option<&CloneLinkTemplate> {
        self.templates.iter().find(|t| t.protocol == protocol)
    }

    /// Returns the first template for `protocol`, or [`CheckoutError::MissingCloneLink`].
    pub fn require(&self, protocol: TransportProtocol) -> Result<&CloneLinkTemplate, CheckoutError> {
        self.find(protocol)
            .ok_or(CheckoutError::MissingCloneLink { protocol })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Url,
    ScpLike,
}

/// A parsed clone URL.
///
/// Until one of the edits below changes something, the URL renders exactly
/// as it was parsed.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::CloneUrl;
///
/// let url = CloneUrl::parse("ssh://git@bitbucket.org/tester/test-repo.git")?;
/// assert_eq!(url.owner(), "tester");
/// assert_eq!(url.repository(), "test-repo");
///
/// let fork = url.with_repository("qa", "qa-repo").into_scp_like();
/// assert_eq!(fork.to_string(), "git@bitbucket.org:qa/qa-repo.git");
/// # Ok::<(), bitbucket_checkout::scm::CheckoutError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneUrl {
    form: Form,
    scheme: String,
    user: Option<String>,
    host: String,
    port: Option<u16>,
    segments: Vec<String>,
    raw: String,
    edited: bool,
}

impl CloneUrl {
    /// Parses a URL-form or SCP-like clone URL.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::InvalidCloneLink`] if the URL matches neither form,
    /// has no host, or has fewer than two path segments.
    pub fn parse(raw: &str) -> Result<Self, CheckoutError> {
        let invalid = || CheckoutError::InvalidCloneLink(raw.to_string());

        let parsed = if raw.contains("://") {
            let url = Url::parse(raw).map_err(|_| invalid())?;
            let host = url.host_str().ok_or_else(invalid)?.to_string();
            let user = Some(url.username())
                .filter(|u| !u.is_empty())
                .map(str::to_string);
            let segments = url
                .path_segments()
                .map(split_segments)
                .unwrap_or_default();
            Self {
                form: Form::Url,
                scheme: url.scheme().to_string(),
                user,
                host,
                port: url.port(),
                segments,
                raw: raw.to_string(),
                edited: false,
            }
        } else {
            let caps = SCP_PATTERN.captures(raw).ok_or_else(invalid)?;
            Self {
                form: Form::ScpLike,
                scheme: "ssh".to_string(),
                user: caps.get(1).map(|m| m.as_str().to_string()),
                host: caps[2].to_string(),
                port: None,
                segments: split_segments(caps[3].split('/')),
                raw: raw.to_string(),
                edited: false,
            }
        };

        if parsed.segments.len() < 2 {
            return Err(invalid());
        }
        Ok(parsed)
    }

    /// Returns the owner segment (workspace or project key).
    pub fn owner(&self) -> &str {
        &self.segments[self.segments.len() - 2]
    }

    /// Returns the repository segment without any `.git` suffix.
    pub fn repository(&self) -> &str {
        let last = &self.segments[self.segments.len() - 1];
        last.strip_suffix(GIT_SUFFIX).unwrap_or(last)
    }

    /// Returns the URL scheme, `ssh` for SCP-like URLs.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the explicit port, if any.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Substitutes the owner and repository segments.
    ///
    /// The repository segment keeps a `.git` suffix if the original had one.
    pub fn with_repository(mut self, owner: &str, repository: &str) -> Self {
        let len = self.segments.len();
        let suffix = if self.segments[len - 1].ends_with(GIT_SUFFIX) {
            GIT_SUFFIX
        } else {
            ""
        };
        let last = format!("{}{}", repository, suffix);
        if self.segments[len - 2] != owner || self.segments[len - 1] != last {
            self.segments[len - 2] = owner.to_string();
            self.segments[len - 1] = last;
            self.edited = true;
        }
        self
    }

    /// Drops any user from the URL.
    ///
    /// HTTPS clone links from Bitbucket Cloud embed the requesting user; the
    /// checkout credential supplies its own.
    pub fn without_user(mut self) -> Self {
        if self.user.take().is_some() {
            self.edited = true;
        }
        self
    }

    /// Converts an SSH URL to SCP-like form, `user@host:owner/repo.git`.
    ///
    /// URLs with an explicit port or a non-SSH scheme are returned unchanged,
    /// since SCP-like syntax cannot carry either.
    pub fn into_scp_like(mut self) -> Self {
        if self.form == Form::Url && self.scheme == "ssh" && self.port.is_none() {
            self.form = Form::ScpLike;
            self.edited = true;
        }
        self
    }
}

impl fmt::Display for CloneUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.edited {
            return f.write_str(&self.raw);
        }
        if self.form == Form::Url {
            write!(f, "{}://", self.scheme)?;
        }
        if let Some(user) = &self.user {
            write!(f, "{}@", user)?;
        }
        write!(f, "{}", self.host)?;
        match self.form {
            Form::Url => {
                if let Some(port) = self.port {
                    write!(f, ":{}", port)?;
                }
                write!(f, "/{}", self.segments.join("/"))
            }
            Form::ScpLike => write!(f, ":{}", self.segments.join("/")),
        }
    }
}

fn split_segments<'s>(segments: impl Iterator<Item = &'s str>) -> Vec<String> {
    segments
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
