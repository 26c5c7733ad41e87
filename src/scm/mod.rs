//
//  bitbucket-checkout
//  scm/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Checkout Configuration Resolution
//!
//! This module turns a Bitbucket repository-model concept (a branch, or a pull
//! request between two repositories) into the concrete configuration a
//! version-control client needs to check it out: remotes, fetch refspecs,
//! revision pinning, an optional merge step and a browser link.
//!
//! ## Overview
//!
//! Four axes drive every decision made here:
//!
//! | Axis | Values |
//! |------|--------|
//! | Backend | Git, Mercurial |
//! | Deployment | Cloud (`bitbucket.org`), Server/Data Center |
//! | Origin | Same repository, fork |
//! | Strategy | Check out the source tip, check out a merge onto the target |
//!
//! ## Architecture
//!
//! - [`RepositoryUriResolver`]: canonical clone URLs when no API clone links are known
//! - [`CloneUrl`]: typed clone URL model covering URL form and SCP-like form
//! - [`GitCheckoutBuilder`]: Git remotes, refspecs, pin and merge directives
//! - [`MercurialCheckoutBuilder`]: single-remote Mercurial configuration
//! - [`CheckoutConfiguration`]: the value both builders produce
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_checkout::scm::{
//!     BackendType, BranchHead, CloneLinkTemplate, CloneLinks, Deployment,
//!     GitCheckoutBuilder, SourceContext,
//! };
//!
//! let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo");
//! let head = BranchHead::new("main", BackendType::Git);
//! let links = CloneLinks::new([
//!     CloneLinkTemplate::https("https://bitbucket.org/tester/test-repo.git"),
//!     CloneLinkTemplate::ssh("ssh://git@bitbucket.org/tester/test-repo.git"),
//! ]);
//!
//! let config = GitCheckoutBuilder::new(context, head, None)?
//!     .with_clone_links(links)
//!     .build()?;
//!
//! assert_eq!(config.remotes[0].url, "https://bitbucket.org/tester/test-repo.git");
//! # Ok::<(), bitbucket_checkout::scm::CheckoutError>(())
//! ```

mod checkout;
mod clone_url;
mod error;
mod git;
mod head;
mod hg;
mod uri;

pub use checkout::*;
pub use clone_url::*;
pub use error::*;
pub use git::*;
pub use head::*;
pub use hg::*;
pub use uri::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CLOUD_ROOT_URL;

/// Version-control backend of a repository.
///
/// Bitbucket Cloud historically hosted both Git and Mercurial repositories.
/// Bitbucket Server only ever hosted Git.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Git repository.
    Git,
    /// Mercurial repository (Cloud only).
    Mercurial,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Git => write!(f, "git"),
            Self::Mercurial => write!(f, "hg"),
        }
    }
}

/// Deployment model of a Bitbucket instance, without its settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentModel {
    /// Bitbucket Cloud (bitbucket.org)
    Cloud,
    /// Bitbucket Server/Data Center
    Server,
}

/// A Bitbucket deployment together with the settings that only exist for it.
///
/// A server root URL is only meaningful for self-hosted instances, so it lives
/// inside the [`Deployment::Server`] variant rather than next to a model flag.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::{Deployment, DeploymentModel};
///
/// let server = Deployment::server("https://bitbucket.example.com/").with_ssh_port(7999);
/// assert_eq!(server.model(), DeploymentModel::Server);
/// assert_eq!(server.root_url(), "https://bitbucket.example.com");
///
/// assert_eq!(Deployment::Cloud.root_url(), "https://bitbucket.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    /// Bitbucket Cloud at bitbucket.org.
    Cloud,
    /// A self-hosted Bitbucket Server/Data Center instance.
    Server {
        /// Web root of the instance, without a trailing slash.
        root_url: String,
        /// Port the instance serves SSH clones on, if known.
        ssh_port: Option<u16>,
    },
}

impl Deployment {
    /// Creates a server deployment rooted at `root_url`.
    ///
    /// Trailing slashes are trimmed so that paths can be appended directly.
    pub fn server(root_url: impl Into<String>) -> Self {
        let root_url: String = root_url.into();
        Self::Server {
            root_url: root_url.trim_end_matches('/').to_string(),
            ssh_port: None,
        }
    }

    /// Sets the SSH port of a server deployment. Has no effect on Cloud.
    pub fn with_ssh_port(self, port: u16) -> Self {
        match self {
            Self::Server { root_url, .. } => Self::Server {
                root_url,
                ssh_port: Some(port),
            },
            Self::Cloud => Self::Cloud,
        }
    }

    /// Returns the deployment model.
    pub fn model(&self) -> DeploymentModel {
        match self {
            Self::Cloud => DeploymentModel::Cloud,
            Self::Server { .. } => DeploymentModel::Server,
        }
    }

    /// Returns the deployment root URL.
    ///
    /// This is also the placeholder answer builders give for any URL query
    /// before clone links are attached.
    pub fn root_url(&self) -> &str {
        match self {
            Self::Cloud => CLOUD_ROOT_URL,
            Self::Server { root_url, .. } => root_url,
        }
    }

    /// Returns the web page of a repository on this deployment.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitbucket_checkout::scm::Deployment;
    ///
    /// assert_eq!(
    ///     Deployment::Cloud.web_url("tester", "test-repo"),
    ///     "https://bitbucket.org/tester/test-repo"
    /// );
    /// assert_eq!(
    ///     Deployment::server("https://bitbucket.example.com").web_url("PROJ", "repo"),
    ///     "https://bitbucket.example.com/projects/PROJ/repos/repo"
    /// );
    /// ```
    ///
    /// # Notes
    ///
    /// - Server URLs carry the project path segment: `{root}/projects/{project}/repos/{repo}`
    pub fn web_url(&self, owner: &str, repository: &str) -> String {
        match self {
            Self::Cloud => format!("{}/{}/{}", CLOUD_ROOT_URL, owner, repository),
            Self::Server { root_url, .. } => {
                format!("{}/projects/{}/repos/{}", root_url, owner, repository)
            }
        }
    }
}

/// Transport protocol of a clone URL.
///
/// The Bitbucket APIs name their clone links `https` (Cloud), `http` (Server,
/// even when the URL is HTTPS) and `ssh`. Both HTTP names map to [`Https`](Self::Https).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportProtocol {
    /// HTTP(S) clone URL.
    #[serde(rename = "https", alias = "http")]
    Https,
    /// SSH clone URL, in `ssh://` or SCP-like form.
    #[serde(rename = "ssh")]
    Ssh,
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Https => write!(f, "https"),
            Self::Ssh => write!(f, "ssh"),
        }
    }
}

/// Shape of a checkout credential.
///
/// Only the kind is ever inspected. The secret itself stays in whatever
/// credential store handed out the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CredentialKind {
    /// An SSH private key.
    #[serde(rename = "ssh")]
    SshKey,
    /// A username and password (or app password / access token).
    #[default]
    #[serde(rename = "password")]
    UsernamePassword,
}

impl CredentialKind {
    /// Returns the clone protocol this kind of credential authenticates.
    pub fn protocol(self) -> TransportProtocol {
        match self {
            Self::SshKey => TransportProtocol::Ssh,
            Self::UsernamePassword => TransportProtocol::Https,
        }
    }
}

/// Opaque reference to a checkout credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CredentialRef {
    /// Identifier in the credential store.
    pub id: String,
    /// What the credential looks like.
    pub kind: CredentialKind,
}

impl CredentialRef {
    /// Creates a reference to an SSH key credential.
    pub fn ssh_key(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: CredentialKind::SshKey,
        }
    }

    /// Creates a reference to a username/password credential.
    pub fn username_password(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: CredentialKind::UsernamePassword,
        }
    }
}

/// The repository a discovery or build runs against.
///
/// For pull requests this is always the *target* repository. Clone links
/// attached to a builder are expected to describe this repository.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::{CredentialRef, Deployment, SourceContext, TransportProtocol};
///
/// let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo");
/// assert_eq!(context.protocol(), TransportProtocol::Https);
///
/// let context = context.with_credential(CredentialRef::ssh_key("deploy-key"));
/// assert_eq!(context.protocol(), TransportProtocol::Ssh);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    /// Deployment the repository is hosted on
    pub deployment: Deployment,
    /// Workspace (Cloud) or project key (Server)
    pub owner: String,
    /// Repository slug
    pub repository: String,
    /// Credential used for checkouts, if any
    pub credential: Option<CredentialRef>,
}

impl SourceContext {
    /// Creates a context without a checkout credential.
    pub fn new(
        deployment: Deployment,
        owner: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            deployment,
            owner: owner.into(),
            repository: repository.into(),
            credential: None,
        }
    }

    /// Attaches the checkout credential.
    pub fn with_credential(mut self, credential: CredentialRef) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Returns the deployment model.
    pub fn model(&self) -> DeploymentModel {
        self.deployment.model()
    }

    /// Returns the clone protocol selected by the checkout credential.
    ///
    /// SSH-key credentials select SSH; anything else, including no credential
    /// at all, selects HTTPS.
    pub fn protocol(&self) -> TransportProtocol {
        self.credential
            .as_ref()
            .map(|c| c.kind.protocol())
            .unwrap_or(TransportProtocol::Https)
    }

    /// Returns the repository path in the format "owner/repo".
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }

    /// Checks whether `owner/repository` names this context's repository.
    ///
    /// Bitbucket resolves repository paths case-insensitively, so the
    /// comparison does too.
    pub fn is_repository(&self, owner: &str, repository: &str) -> bool {
        self.owner.eq_ignore_ascii_case(owner) && self.repository.eq_ignore_ascii_case(repository)
    }
}

/// Checks a head against the builder's backend and the source context.
///
/// Enforces that pull requests from the same repository really point at the
/// context repository and that forks never do.
pub(crate) fn check_head(
    context: &SourceContext,
    head: &Head,
    backend: BackendType,
) -> Result<(), CheckoutError> {
    if head.backend() != backend {
        return Err(CheckoutError::BackendMismatch {
            head: head.name(),
            expected: backend,
            actual: head.backend(),
        });
    }

    if let Head::PullRequest(pr) = head {
        let same = context.is_repository(&pr.origin_owner, &pr.origin_repository);
        match pr.origin {
            Origin::Same if !same => {
                return Err(CheckoutError::InvalidHead {
                    head: head.name(),
                    reason: format!(
                        "origin {}/{} is not {}",
                        pr.origin_owner,
                        pr.origin_repository,
                        context.full_name()
                    ),
                });
            }
            Origin::Fork if same => {
                return Err(CheckoutError::InvalidHead {
                    head: head.name(),
                    reason: format!("fork origin is the target repository {}", context.full_name()),
                });
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(owner: &str, repo: &str, origin: Origin) -> Head {
        Head::PullRequest(PullRequestHead {
            id: 7,
            origin_owner: owner.to_string(),
            origin_repository: repo.to_string(),
            origin_branch: "feature".to_string(),
            target: BranchHead::new("main", BackendType::Git),
            origin,
            strategy: CheckoutStrategy::Head,
        })
    }

    #[test]
    fn test_server_root_trims_trailing_slash() {
        let deployment = Deployment::server("https://bitbucket.example.com/context/");
        assert_eq!(deployment.root_url(), "https://bitbucket.example.com/context");
    }

    #[test]
    fn test_ssh_port_ignored_on_cloud() {
        assert_eq!(Deployment::Cloud.with_ssh_port(22), Deployment::Cloud);
    }

    #[test]
    fn test_protocol_follows_credential_kind() {
        let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo");
        assert_eq!(context.protocol(), TransportProtocol::Https);
        let context = context.with_credential(CredentialRef::username_password("user-pass"));
        assert_eq!(context.protocol(), TransportProtocol::Https);
        let context = context.with_credential(CredentialRef::ssh_key("key"));
        assert_eq!(context.protocol(), TransportProtocol::Ssh);
    }

    #[test]
    fn test_is_repository_ignores_case() {
        let context = SourceContext::new(Deployment::Cloud, "Tester", "Test-Repo");
        assert!(context.is_repository("tester", "test-repo"));
        assert!(!context.is_repository("qa", "test-repo"));
    }

    #[test]
    fn test_check_head_rejects_fork_of_itself() {
        let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo");
        let err = check_head(&context, &pr("tester", "test-repo", Origin::Fork), BackendType::Git)
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidHead { .. }));
    }

    #[test]
    fn test_check_head_rejects_same_origin_elsewhere() {
        let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo");
        let err = check_head(&context, &pr("qa", "qa-repo", Origin::Same), BackendType::Git)
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidHead { .. }));
    }

    #[test]
    fn test_check_head_rejects_wrong_backend() {
        let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo");
        let head = Head::Branch(BranchHead::new("main", BackendType::Mercurial));
        let err = check_head(&context, &head, BackendType::Git).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::BackendMismatch {
                head: "main".to_string(),
                expected: BackendType::Git,
                actual: BackendType::Mercurial,
            }
        );
    }

    #[test]
    fn test_credential_kind_deserializes_from_config_names() {
        #[derive(Deserialize)]
        struct Holder {
            kind: CredentialKind,
        }
        let holder: Holder = toml::from_str("kind = \"ssh\"").unwrap();
        assert_eq!(holder.kind, CredentialKind::SshKey);
        let holder: Holder = toml::from_str("kind = \"password\"").unwrap();
        assert_eq!(holder.kind, CredentialKind::UsernamePassword);
    }
}
