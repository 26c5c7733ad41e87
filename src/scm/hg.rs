//
//  bitbucket-checkout
//  scm/hg.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Mercurial checkout configuration.
//!
//! Mercurial is only hosted by Bitbucket Cloud. A Mercurial checkout has a
//! single `default` remote pointing at the repository the head's content
//! lives in, and always updates to either a changeset or a branch tip.
//! The merge strategy is accepted but adds nothing.

use tracing::debug;

use super::{
    check_head, BackendType, CheckoutConfiguration, CheckoutError, CloneLinks, CloneUrl,
    Deployment, Head, HgRevisionKind, PinDirective, RemoteSpec, Revision, SourceContext,
    TransportProtocol,
};

/// Name of the single Mercurial remote.
pub const HG_DEFAULT_REMOTE: &str = "default";

/// Builds the Mercurial checkout configuration of one head.
///
/// Like [`GitCheckoutBuilder`](super::GitCheckoutBuilder), URL queries answer
/// with the deployment root until clone links are attached.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::{
///     BackendType, BranchHead, Deployment, HgRevisionKind, MercurialCheckoutBuilder,
///     PinDirective, SourceContext,
/// };
///
/// let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo");
/// let head = BranchHead::new("test-branch", BackendType::Mercurial);
/// let builder = MercurialCheckoutBuilder::new(context, head, None)?;
///
/// assert_eq!(
///     builder.revision(),
///     PinDirective::Mercurial {
///         kind: HgRevisionKind::Branch,
///         value: "test-branch".to_string(),
///     }
/// );
/// # Ok::<(), bitbucket_checkout::scm::CheckoutError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MercurialCheckoutBuilder {
    context: SourceContext,
    head: Head,
    revision: Option<Revision>,
    clone_links: Option<CloneLinks>,
}

impl MercurialCheckoutBuilder {
    /// Creates a builder for `head` on the `context` repository.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::UnsupportedBackend`] on a Server deployment
    /// - [`CheckoutError::BackendMismatch`] for a Git head
    /// - [`CheckoutError::InvalidHead`] for a pull request whose origin
    ///   contradicts its same/fork flag
    /// - [`CheckoutError::RevisionMismatch`] for a revision taken on another
    ///   head, or one that is not made of changesets
    pub fn new(
        context: SourceContext,
        head: impl Into<Head>,
        revision: Option<Revision>,
    ) -> Result<Self, CheckoutError> {
        if let Deployment::Server { .. } = context.deployment {
            return Err(CheckoutError::UnsupportedBackend {
                backend: BackendType::Mercurial,
            });
        }

        let head = head.into();
        check_head(&context, &head, BackendType::Mercurial)?;

        if let Some(revision) = &revision {
            if !revision.is_on(&head) {
                return Err(CheckoutError::RevisionMismatch {
                    head: head.name(),
                    reason: "revision was taken on another head".to_string(),
                });
            }
            if !revision.is_backend(BackendType::Mercurial) {
                return Err(CheckoutError::RevisionMismatch {
                    head: head.name(),
                    reason: "Mercurial checkouts need changeset revisions".to_string(),
                });
            }
        }

        if let Some(pr) = head.as_pull_request() {
            if pr.is_merge() {
                debug!("Merge strategy has no effect on Mercurial head {}", pr.name());
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
            BackendType::Mercurial,
            &self.context.deployment,
        )?;
        Ok(self.with_clone_links(links))
    }

    /// Checks whether clone links are attached.
    pub fn is_resolved(&self) -> bool {
        self.clone_links.is_some()
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    /// Returns the clone URL of `owner/repository`, rewriting the context
    /// repository's template when they differ.
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

        let mut url = CloneUrl::parse(&template.url)?;
        if protocol == TransportProtocol::Https {
            url = url.without_user();
        }
        if !self.context.is_repository(owner, repository) {
            debug!("Rewriting clone link for {}/{}", owner, repository);
            url = url.with_repository(owner, repository);
        }

        Ok(url.to_string())
    }

    /// Returns the URL of the repository the head's content lives in.
    pub fn source(&self) -> Result<String, CheckoutError> {
        let (owner, repository) = self.origin_repository();
        self.remote_url(owner, repository)
    }

    /// Returns what to update to: the known changeset, else the branch tip.
    ///
    /// Pull requests track their source branch.
    pub fn revision(&self) -> PinDirective {
        match &self.revision {
            Some(revision) => PinDirective::Mercurial {
                kind: HgRevisionKind::Changeset,
                value: revision.hash().to_string(),
            },
            None => PinDirective::Mercurial {
                kind: HgRevisionKind::Branch,
                value: self.head.branch_name().to_string(),
            },
        }
    }

    /// Returns the web page of the repository the head's content lives in.
    pub fn browser_url(&self) -> String {
        let (owner, repository) = self.origin_repository();
        self.context.deployment.web_url(owner, repository)
    }

    /// Materializes the checkout configuration.
    pub fn build(&self) -> Result<CheckoutConfiguration, CheckoutError> {
        Ok(CheckoutConfiguration {
            remotes: vec![RemoteSpec {
                name: HG_DEFAULT_REMOTE.to_string(),
                url: self.source()?,
                refspec: None,
                credential: self.context.credential.clone(),
            }],
            pin: Some(self.revision()),
            merge: None,
            browser_url: self.browser_url(),
        })
    }

    fn origin_repository(&self) -> (&str, &str) {
        match &self.head {
            Head::PullRequest(pr) => (pr.origin_owner.as_str(), pr.origin_repository.as_str()),
            Head::Branch(_) => (
                self.context.owner.as_str(),
                self.context.repository.as_str(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scm::{
        BranchHead, CheckoutStrategy, CloneLinkTemplate, CredentialRef, Origin, PullRequestHead,
    };

    fn links() -> CloneLinks {
        CloneLinks::new([
            CloneLinkTemplate::https("https://bitbucket.org/tester/test-repo"),
            CloneLinkTemplate::ssh("ssh://hg@bitbucket.org/tester/test-repo"),
        ])
    }

    fn context() -> SourceContext {
        SourceContext::new(Deployment::Cloud, "tester", "test-repo")
    }

    fn branch() -> BranchHead {
        BranchHead::new("test-branch", BackendType::Mercurial)
    }

    fn fork(strategy: CheckoutStrategy) -> PullRequestHead {
        PullRequestHead {
            id: 1,
            origin_owner: "qa".to_string(),
            origin_repository: "qa-repo".to_string(),
            origin_branch: "qa-branch".to_string(),
            target: branch(),
            origin: Origin::Fork,
            strategy,
        }
    }

    #[test]
    fn test_branch_without_revision_tracks_branch() {
        let builder = MercurialCheckoutBuilder::new(context(), branch(), None).unwrap();
        assert_eq!(
            builder.revision(),
            PinDirective::Mercurial {
                kind: HgRevisionKind::Branch,
                value: "test-branch".to_string(),
            }
        );
    }

    #[test]
    fn test_changeset_revision() {
        let revision = Revision::changeset(branch(), "0123abcd");
        let builder = MercurialCheckoutBuilder::new(context(), branch(), Some(revision)).unwrap();
        assert_eq!(
            builder.revision(),
            PinDirective::Mercurial {
                kind: HgRevisionKind::Changeset,
                value: "0123abcd".to_string(),
            }
        );
    }

    #[test]
    fn test_branch_over_https() {
        let config = MercurialCheckoutBuilder::new(context(), branch(), None)
            .unwrap()
            .with_clone_links(links())
            .build()
            .unwrap();
        assert_eq!(config.remotes.len(), 1);
        assert_eq!(config.remotes[0].name, "default");
        assert_eq!(config.remotes[0].url, "https://bitbucket.org/tester/test-repo");
        assert_eq!(config.remotes[0].refspec, None);
        assert_eq!(config.merge, None);
        assert_eq!(config.browser_url, "https://bitbucket.org/tester/test-repo");
    }

    #[test]
    fn test_fork_over_ssh_targets_origin() {
        let context = context().with_credential(CredentialRef::ssh_key("key"));
        let builder = MercurialCheckoutBuilder::new(context, fork(CheckoutStrategy::Head), None)
            .unwrap()
            .with_clone_links(links());
        assert_eq!(builder.source().unwrap(), "ssh://hg@bitbucket.org/qa/qa-repo");
        assert_eq!(builder.browser_url(), "https://bitbucket.org/qa/qa-repo");
        assert_eq!(
            builder.revision(),
            PinDirective::Mercurial {
                kind: HgRevisionKind::Branch,
                value: "qa-branch".to_string(),
            }
        );
    }

    #[test]
    fn test_merge_strategy_adds_nothing() {
        let head = fork(CheckoutStrategy::Merge);
        let merged = MercurialCheckoutBuilder::new(context(), head, None)
            .unwrap()
            .with_clone_links(links())
            .build()
            .unwrap();
        let tip = MercurialCheckoutBuilder::new(context(), fork(CheckoutStrategy::Head), None)
            .unwrap()
            .with_clone_links(links())
            .build()
            .unwrap();
        assert_eq!(merged, tip);
        assert_eq!(merged.merge, None);
    }

    #[test]
    fn test_pull_request_revision_pins_source_changeset() {
        let head = fork(CheckoutStrategy::Merge);
        let revision = Revision::pull_request(
            head.clone(),
            Revision::changeset(branch(), "target-cs"),
            Revision::changeset(head.clone(), "source-cs"),
        );
        let builder = MercurialCheckoutBuilder::new(context(), head, Some(revision)).unwrap();
        assert_eq!(
            builder.revision(),
            PinDirective::Mercurial {
                kind: HgRevisionKind::Changeset,
                value: "source-cs".to_string(),
            }
        );
    }

    #[test]
    fn test_unresolved_answers_with_deployment_root() {
        let builder = MercurialCheckoutBuilder::new(context(), fork(CheckoutStrategy::Head), None)
            .unwrap();
        assert!(!builder.is_resolved());
        assert_eq!(builder.source().unwrap(), "https://bitbucket.org");

        let config = builder.build().unwrap();
        assert_eq!(config.remotes.len(), 1);
        assert_eq!(config.remotes[0].name, HG_DEFAULT_REMOTE);
        assert_eq!(config.remotes[0].url, "https://bitbucket.org");
        assert_eq!(
            config.pin,
            Some(PinDirective::Mercurial {
                kind: HgRevisionKind::Branch,
                value: "qa-branch".to_string(),
            })
        );
        assert_eq!(config.merge, None);
        assert_eq!(config.browser_url, "https://bitbucket.org/qa/qa-repo");
    }

    #[test]
    fn test_server_is_unsupported() {
        let context = SourceContext::new(Deployment::server("https://bitbucket.test"), "PROJ", "repo");
        let err = MercurialCheckoutBuilder::new(context, branch(), None).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::UnsupportedBackend {
                backend: BackendType::Mercurial
            }
        );
    }

    #[test]
    fn test_rejects_commit_revision() {
        let revision = Revision::commit(branch(), "abc");
        let err = MercurialCheckoutBuilder::new(context(), branch(), Some(revision)).unwrap_err();
        assert!(matches!(err, CheckoutError::RevisionMismatch { .. }));
    }

    #[test]
    fn test_fallback_clone_links() {
        let config = MercurialCheckoutBuilder::new(context(), branch(), None)
            .unwrap()
            .with_fallback_clone_links()
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.remotes[0].url, "https://bitbucket.org/tester/test-repo");
    }
}
