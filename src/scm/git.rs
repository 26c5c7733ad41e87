//
//  bitbucket-checkout
//  scm/git.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Git Checkout Configuration
//!
//! Builds the Git checkout configuration of a branch or pull request.
//!
//! ## Refspecs
//!
//! | Head | Deployment | Refspec |
//! |------|------------|---------|
//! | Branch | any | `+refs/heads/{name}:refs/remotes/@{remote}/{name}` |
//! | Pull request | Server | `+refs/pull-requests/{id}/from:refs/remotes/@{remote}/PR-{id}` |
//! | Pull request | Cloud | `+refs/heads/{origin_branch}:refs/remotes/@{remote}/PR-{id}` |
//!
//! Bitbucket Server publishes every pull request's source commit as a ref on
//! the target repository, so Server pull requests are always fetched from the
//! target repository, forks included. Cloud pull requests are fetched by
//! branch name from the repository the source branch lives in.
//!
//! ## Merge Strategy
//!
//! Merge-strategy pull requests get a second `upstream` remote tracking the
//! target branch, and a [`MergeDirective`] onto `remotes/upstream/{target}`.

use tracing::debug;

use super::{
    check_head, BackendType, CheckoutConfiguration, CheckoutError, CloneLinks, CloneUrl,
    DeploymentModel, Head, MergeDirective, PinDirective, RemoteSpec, Revision, SourceContext,
    TransportProtocol,
};

/// Placeholder for the remote name in refspecs returned by [`ref_specs`].
pub const REMOTE_PLACEHOLDER: &str = "@{remote}";

/// Name of the remote holding the head's content.
pub const ORIGIN_REMOTE: &str = "origin";

/// Name of the remote tracking a pull request's target branch.
pub const UPSTREAM_REMOTE: &str = "upstream";

/// Returns the fetch refspecs of `head` on a `model` deployment.
///
/// The destination side uses [`REMOTE_PLACEHOLDER`] for the remote name.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::{ref_specs, BackendType, BranchHead, DeploymentModel, Head};
///
/// let head: Head = BranchHead::new("main", BackendType::Git).into();
/// assert_eq!(
///     ref_specs(&head, DeploymentModel::Cloud),
///     vec!["+refs/heads/main:refs/remotes/@{remote}/main".to_string()]
/// );
/// ```
pub fn ref_specs(head: &Head, model: DeploymentModel) -> Vec<String> {
    vec![ref_spec(head, model)]
}

fn ref_spec(head: &Head, model: DeploymentModel) -> String {
    match head {
        Head::Branch(branch) => format!(
            "+refs/heads/{name}:refs/remotes/{REMOTE_PLACEHOLDER}/{name}",
            name = branch.name
        ),
        Head::PullRequest(pr) => match model {
            DeploymentModel::Server => format!(
                "+refs/pull-requests/{}/from:refs/remotes/{}/{}",
                pr.id,
                REMOTE_PLACEHOLDER,
                pr.name()
            ),
            DeploymentModel::Cloud => format!(
                "+refs/heads/{}:refs/remotes/{}/{}",
                pr.origin_branch,
                REMOTE_PLACEHOLDER,
                pr.name()
            ),
        },
    }
}

/// Builds the Git checkout configuration of one head.
///
/// A builder starts without clone links. In that state every URL query
/// answers with the deployment root (`https://bitbucket.org` or the server
/// root URL) so callers can see it is not configured yet. Attaching clone
/// links with [`with_clone_links`](Self::with_clone_links) makes every query
/// return real values.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::{
///     BackendType, BranchHead, CheckoutStrategy, CloneLinkTemplate, CloneLinks,
///     CredentialRef, Deployment, GitCheckoutBuilder, Origin, PullRequestHead, SourceContext,
/// };
///
/// let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo")
///     .with_credential(CredentialRef::ssh_key("ssh-key"));
/// let head = PullRequestHead {
///     id: 1,
///     origin_owner: "qa".to_string(),
///     origin_repository: "qa-repo".to_string(),
///     origin_branch: "qa-branch".to_string(),
///     target: BranchHead::new("test-branch", BackendType::Git),
///     origin: Origin::Fork,
///     strategy: CheckoutStrategy::Merge,
/// };
///
/// let builder = GitCheckoutBuilder::new(context, head, None)?;
/// assert_eq!(builder.remote()?, "https://bitbucket.org");
///
/// let builder = builder.with_clone_links(CloneLinks::new([
///     CloneLinkTemplate::https("https://bitbucket.org/tester/test-repo.git"),
///     CloneLinkTemplate::ssh("ssh://git@bitbucket.org/tester/test-repo.git"),
/// ]));
/// let config = builder.build()?;
///
/// assert_eq!(config.remotes[0].url, "git@bitbucket.org:qa/qa-repo.git");
/// assert_eq!(config.remotes[1].url, "git@bitbucket.org:tester/test-repo.git");
/// # Ok::<(), bitbucket_checkout::scm::CheckoutError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GitCheckoutBuilder {
    context: SourceContext,
    head: Head,
    revision: Option<Revision>,
    clone_links: Option<CloneLinks>,
}

impl GitCheckoutBuilder {
    /// Creates a builder for `head` on the `context` repository.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::BackendMismatch`] for a Mercurial head
    /// - [`CheckoutError::InvalidHead`] for a pull request whose origin
    ///   contradicts its same/fork flag
    /// - [`CheckoutError::RevisionMismatch`] for a revision taken on another
    ///   head, or one that is not made of Git commits
    pub fn new(
        context: SourceContext,
        head: impl Into<Head>,
        revision: Option<Revision>,
    ) -> Result<Self, CheckoutError> {
        let head = head.into();
        check_head(&context, &head, BackendType::Git)?;

        if let Some(revision) = &revision {
            if !revision.is_on(&head) {
                return Err(CheckoutError::RevisionMismatch {
                    head: head.name(),
                    reason: "revision was taken on another head".to_string(),
                });
            }
            if !revision.is_backend(BackendType::Git) {
                return Err(CheckoutError::RevisionMismatch {
                    head: head.name(),
                    reason: "Git checkouts need commit revisions".to_string(),
                });
            }
        }

        Ok(Self {
            context,
            head,
            revision,
            clone_links: None,
        })
    }

    /// Attaches the clone links of the context repository.
    pub fn with_clone_links(mut self, clone_links: CloneLinks) -> Self {
        self.clone_links = Some(clone_links);
        self
    }

    /// Attaches clone links derived from the [`RepositoryUriResolver`](super::RepositoryUriResolver).
    pub fn with_fallback_clone_links(self) -> Result<Self, CheckoutError> {
        let links = CloneLinks::fallback(
            &self.context.owner,
            &self.context.repository,
            BackendType::Git,
            &self.context.deployment,
        )?;
        Ok(self.with_clone_links(links))
    }

    /// Checks whether clone links are attached.
    pub fn is_resolved(&self) -> bool {
        self.clone_links.is_some()
    }

    pub fn context(&self) -> &SourceContext {
        &self.context
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    /// Returns the refspecs of the head, with [`REMOTE_PLACEHOLDER`] unresolved.
    pub fn ref_specs(&self) -> Vec<String> {
        ref_specs(&self.head, self.context.model())
    }

    /// Returns the clone URL of `owner/repository`.
    ///
    /// The template is picked by the credential's protocol. Templates describe
    /// the context repository; for any other repository the owner and
    /// repository path segments are rewritten. On Cloud, SSH URLs are given
    /// in SCP-like form.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::MissingCloneLink`] if no template matches the protocol
    /// - [`CheckoutError::InvalidCloneLink`] if the template cannot be parsed
    pub fn remote_url(&self, owner: &str, repository: &str) -> Result<String, CheckoutError> {
        let Some(links) = &self.clone_links else {
            debug!(
                "No clone links for {}, answering with deployment root",
                self.context.full_name()
            );
            return Ok(self.context.deployment.root_url().to_string());
        };

        let protocol = self.context.protocol();
        let template = links.require(protocol)?;
        debug!("Using {} clone link {}", protocol, template.url);

        let mut url = CloneUrl::parse(&template.url)?;
        url = match (protocol, self.context.model()) {
            (TransportProtocol::Https, _) => url.without_user(),
            (TransportProtocol::Ssh, DeploymentModel::Cloud) => url.into_scp_like(),
            (TransportProtocol::Ssh, DeploymentModel::Server) => url,
        };

        if !self.context.is_repository(owner, repository) {
            debug!("Rewriting clone link for {}/{}", owner, repository);
            url = url.with_repository(owner, repository);
        }

        Ok(url.to_string())
    }

    /// Returns the URL of the `origin` remote.
    pub fn remote(&self) -> Result<String, CheckoutError> {
        let (owner, repository) = self.fetch_repository();
        self.remote_url(owner, repository)
    }

    /// Returns the repository web page for browser links.
    ///
    /// Cloud links point at the repository the head's content lives in. Server
    /// links always point at the context repository, where Bitbucket Server
    /// anchors pull request pages.
    pub fn browser_url(&self) -> String {
        let (owner, repository) = match self.context.model() {
            DeploymentModel::Cloud => self.fetch_repository(),
            DeploymentModel::Server => (
                self.context.owner.as_str(),
                self.context.repository.as_str(),
            ),
        };
        self.context.deployment.web_url(owner, repository)
    }

    /// Materializes the checkout configuration.
    ///
    /// Calling this repeatedly yields identical configurations.
    ///
    /// # Errors
    ///
    /// Same as [`remote_url`](Self::remote_url). Without clone links this never
    /// fails; remote URLs are the deployment root instead.
    pub fn build(&self) -> Result<CheckoutConfiguration, CheckoutError> {
        let credential = self.context.credential.clone();

        let mut remotes = vec![RemoteSpec {
            name: ORIGIN_REMOTE.to_string(),
            url: self.remote()?,
            refspec: Some(
                ref_spec(&self.head, self.context.model())
                    .replace(REMOTE_PLACEHOLDER, ORIGIN_REMOTE),
            ),
            credential: credential.clone(),
        }];

        let mut merge = None;
        if let Head::PullRequest(pr) = &self.head {
            if pr.is_merge() {
                let target = &pr.target.name;
                remotes.push(RemoteSpec {
                    name: UPSTREAM_REMOTE.to_string(),
                    url: self.remote_url(&self.context.owner, &self.context.repository)?,
                    refspec: Some(format!(
                        "+refs/heads/{target}:refs/remotes/{UPSTREAM_REMOTE}/{target}"
                    )),
                    credential,
                });
                merge = Some(MergeDirective {
                    base_remote_ref: format!("remotes/{UPSTREAM_REMOTE}/{target}"),
                    base_hash: self
                        .revision
                        .as_ref()
                        .and_then(Revision::target_hash)
                        .map(str::to_string),
                });
            }
        }

        let pin = self.revision.as_ref().map(|revision| PinDirective::Git {
            branch_name: self.head.name(),
            commit_hash: revision.hash().to_string(),
        });

        Ok(CheckoutConfiguration {
            remotes,
            pin,
            merge,
            browser_url: self.browser_url(),
        })
    }

    /// Returns the repository the head's content is fetched from.
    ///
    /// Cloud pull requests come from their origin repository. Everything else,
    /// including Server pull requests from forks, comes from the context
    /// repository.
    fn fetch_repository(&self) -> (&str, &str) {
        match (&self.head, self.context.model()) {
            (Head::PullRequest(pr), DeploymentModel::Cloud) => {
                (pr.origin_owner.as_str(), pr.origin_repository.as_str())
            }
            _ => (
                self.context.owner.as_str(),
                self.context.repository.as_str(),
            ),
        }
    }
}
