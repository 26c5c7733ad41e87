//
//  bitbucket-checkout
//  scm/uri.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository URI Resolver
//!
//! Canonical clone URLs for a repository, derived from its owner and name
//! alone. This is the fallback used whenever the Bitbucket API has not yet
//! described the repository with clone links of its own.
//!
//! ## Supported URL Formats
//!
//! | Backend | Protocol | Cloud | Server/DC |
//! |---------|----------|-------|-----------|
//! | Git | HTTPS | `https://bitbucket.org/{owner}/{repo}.git` | `{root}/scm/{owner}/{repo}.git` |
//! | Git | SSH | `git@bitbucket.org:{owner}/{repo}.git` | `ssh://git@{host}:{port}/{owner}/{repo}.git` |
//! | Mercurial | HTTPS | `https://bitbucket.org/{owner}/{repo}` | unsupported |
//! | Mercurial | SSH | `ssh://hg@bitbucket.org/{owner}/{repo}` | unsupported |

use url::Url;

use super::{BackendType, CheckoutError, Deployment, TransportProtocol};
use crate::config::BITBUCKET_CLOUD;

/// Resolves canonical clone URLs for one backend on one deployment.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::{BackendType, Deployment, RepositoryUriResolver, TransportProtocol};
///
/// let resolver = RepositoryUriResolver::new(BackendType::Git, &Deployment::Cloud);
/// assert_eq!(
///     resolver.resolve("tester", "test-repo", TransportProtocol::Ssh)?,
///     "git@bitbucket.org:tester/test-repo.git"
/// );
///
/// let server = Deployment::server("https://bitbucket.example.com").with_ssh_port(7999);
/// let resolver = RepositoryUriResolver::new(BackendType::Git, &server);
/// assert_eq!(
///     resolver.resolve("PROJ", "repo", TransportProtocol::Ssh)?,
///     "ssh://git@bitbucket.example.com:7999/PROJ/repo.git"
/// );
/// # Ok::<(), bitbucket_checkout::scm::CheckoutError>(())
/// ```
///
/// # Notes
///
/// - On Server without a known SSH port, the port is left out rather than guessed
/// - Mercurial on Server fails with [`CheckoutError::UnsupportedBackend`] for every protocol
#[derive(Debug, Clone, Copy)]
pub struct RepositoryUriResolver<'a> {
    backend: BackendType,
    deployment: &'a Deployment,
}

impl<'a> RepositoryUriResolver<'a> {
    /// Creates a resolver for `backend` repositories on `deployment`.
    pub fn new(backend: BackendType, deployment: &'a Deployment) -> Self {
        Self {
            backend,
            deployment,
        }
    }

    /// Resolves the clone URL of `owner/repository` for `protocol`.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::UnsupportedBackend`] for Mercurial on Server
    /// - [`CheckoutError::InvalidServerUrl`] if a Server SSH URL is needed and
    ///   the root URL has no host
    pub fn resolve(
        &self,
        owner: &str,
        repository: &str,
        protocol: TransportProtocol,
    ) -> Result<String, CheckoutError> {
        match (self.backend, self.deployment) {
            (BackendType::Git, Deployment::Cloud) => Ok(match protocol {
                TransportProtocol::Https => {
                    format!("https://{}/{}/{}.git", BITBUCKET_CLOUD, owner, repository)
                }
                TransportProtocol::Ssh => {
                    format!("git@{}:{}/{}.git", BITBUCKET_CLOUD, owner, repository)
                }
            }),
            (BackendType::Git, Deployment::Server { root_url, ssh_port }) => match protocol {
                TransportProtocol::Https => {
                    Ok(format!("{}/scm/{}/{}.git", root_url, owner, repository))
                }
                TransportProtocol::Ssh => {
                    let host = server_host(root_url)?;
                    Ok(match ssh_port {
                        Some(port) => {
                            format!("ssh://git@{}:{}/{}/{}.git", host, port, owner, repository)
                        }
                        None => format!("ssh://git@{}/{}/{}.git", host, owner, repository),
                    })
                }
            },
            (BackendType::Mercurial, Deployment::Cloud) => Ok(match protocol {
                TransportProtocol::Https => {
                    format!("https://{}/{}/{}", BITBUCKET_CLOUD, owner, repository)
                }
                TransportProtocol::Ssh => {
                    format!("ssh://hg@{}/{}/{}", BITBUCKET_CLOUD, owner, repository)
                }
            }),
            (BackendType::Mercurial, Deployment::Server { .. }) => {
                Err(CheckoutError::UnsupportedBackend {
                    backend: BackendType::Mercurial,
                })
            }
        }
    }
}

/// Extracts the host of a server root URL.
fn server_host(root_url: &str) -> Result<String, CheckoutError> {
    Url::parse(root_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .ok_or_else(|| CheckoutError::InvalidServerUrl(root_url.to_string()))
}
