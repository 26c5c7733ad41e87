//
//  bitbucket-checkout
//  scm/head.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Heads and revisions.
//!
//! A [`Head`] is something buildable (a branch or a pull request) with no
//! checkout mechanics attached. A [`Revision`] optionally freezes a head at a
//! commit observed during discovery; without one, builds track the branch tip.

use serde::Serialize;

use super::BackendType;

/// A branch of the source repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BranchHead {
    /// Branch name, e.g. `main` or `feature/login`
    pub name: String,
    /// Backend of the repository the branch lives in
    pub backend: BackendType,
}

impl BranchHead {
    /// Creates a branch head.
    pub fn new(name: impl Into<String>, backend: BackendType) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }
}

/// Where a pull request's source branch lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Source branch lives in the target repository.
    Same,
    /// Source branch lives in a fork of the target repository.
    Fork,
}

/// What a pull request build checks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStrategy {
    /// The tip of the source branch.
    #[default]
    Head,
    /// The source branch merged onto the target branch.
    Merge,
}

/// A pull request.
///
/// # Fields
///
/// * `id` - Pull request number
/// * `origin_owner` / `origin_repository` - Repository the source branch lives in
/// * `origin_branch` - Source branch name inside the origin repository
/// * `target` - Branch the pull request merges into
/// * `origin` - Same repository or fork
/// * `strategy` - Checkout strategy decided upstream
///
/// # Notes
///
/// - With [`Origin::Same`], the origin repository must be the target repository
/// - With [`Origin::Fork`], it must be a different one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PullRequestHead {
    pub id: u64,
    pub origin_owner: String,
    pub origin_repository: String,
    pub origin_branch: String,
    pub target: BranchHead,
    pub origin: Origin,
    pub strategy: CheckoutStrategy,
}

impl PullRequestHead {
    /// Returns the local name the pull request is fetched into, `PR-{id}`.
    pub fn name(&self) -> String {
        format!("PR-{}", self.id)
    }

    /// Returns the backend of the target repository.
    pub fn backend(&self) -> BackendType {
        self.target.backend
    }

    /// Checks whether the build merges the source onto the target.
    pub fn is_merge(&self) -> bool {
        self.strategy == CheckoutStrategy::Merge
    }
}

/// A buildable head.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::{
///     BackendType, BranchHead, CheckoutStrategy, Head, Origin, PullRequestHead,
/// };
///
/// let branch: Head = BranchHead::new("main", BackendType::Git).into();
/// assert_eq!(branch.name(), "main");
///
/// let pr: Head = PullRequestHead {
///     id: 1,
///     origin_owner: "qa".to_string(),
///     origin_repository: "qa-repo".to_string(),
///     origin_branch: "qa-branch".to_string(),
///     target: BranchHead::new("main", BackendType::Git),
///     origin: Origin::Fork,
///     strategy: CheckoutStrategy::Merge,
/// }
/// .into();
/// assert_eq!(pr.name(), "PR-1");
/// assert_eq!(pr.branch_name(), "qa-branch");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Head {
    /// A branch of the source repository.
    Branch(BranchHead),
    /// A pull request into the source repository.
    PullRequest(PullRequestHead),
}

impl Head {
    /// Returns the head name: the branch name, or `PR-{id}` for pull requests.
    pub fn name(&self) -> String {
        match self {
            Self::Branch(branch) => branch.name.clone(),
            Self::PullRequest(pr) => pr.name(),
        }
    }

    /// Returns the branch holding the head's content.
    ///
    /// For a pull request this is the source branch in the origin repository.
    pub fn branch_name(&self) -> &str {
        match self {
            Self::Branch(branch) => &branch.name,
            Self::PullRequest(pr) => &pr.origin_branch,
        }
    }

    /// Returns the backend of the repository the head belongs to.
    pub fn backend(&self) -> BackendType {
        match self {
            Self::Branch(branch) => branch.backend,
            Self::PullRequest(pr) => pr.backend(),
        }
    }

    /// Returns the pull request, if this head is one.
    pub fn as_pull_request(&self) -> Option<&PullRequestHead> {
        match self {
            Self::Branch(_) => None,
            Self::PullRequest(pr) => Some(pr),
        }
    }
}

impl From<BranchHead> for Head {
    fn from(branch: BranchHead) -> Self {
        Self::Branch(branch)
    }
}

impl From<PullRequestHead> for Head {
    fn from(pr: PullRequestHead) -> Self {
        Self::PullRequest(pr)
    }
}

/// A head frozen at a specific point in its history.
///
/// # Variants
///
/// | Variant | Backend | Pins |
/// |---------|---------|------|
/// | `Commit` | Git | a commit hash |
/// | `Changeset` | Mercurial | a changeset id |
/// | `PullRequest` | either | the source tip, plus the target tip for merges |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Revision {
    /// A Git commit on a head.
    Commit { head: Head, hash: String },
    /// A Mercurial changeset on a head.
    Changeset { head: Head, changeset_id: String },
    /// The pair of tips a pull request was discovered with.
    PullRequest {
        head: PullRequestHead,
        target: Box<Revision>,
        source: Box<Revision>,
    },
}

impl Revision {
    /// Creates a Git commit revision.
    pub fn commit(head: impl Into<Head>, hash: impl Into<String>) -> Self {
        Self::Commit {
            head: head.into(),
            hash: hash.into(),
        }
    }

    /// Creates a Mercurial changeset revision.
    pub fn changeset(head: impl Into<Head>, changeset_id: impl Into<String>) -> Self {
        Self::Changeset {
            head: head.into(),
            changeset_id: changeset_id.into(),
        }
    }

    /// Creates a pull request revision from the target and source tips.
    pub fn pull_request(head: PullRequestHead, target: Revision, source: Revision) -> Self {
        Self::PullRequest {
            head,
            target: Box::new(target),
            source: Box::new(source),
        }
    }

    /// Checks whether this revision was taken on `head`.
    ///
    /// A pull request revision also needs its source tip on the pull request
    /// and its target tip on the pull request's target branch.
    pub fn is_on(&self, head: &Head) -> bool {
        match (self, head) {
            (Self::Commit { head: own, .. }, _) | (Self::Changeset { head: own, .. }, _) => {
                own == head
            }
            (
                Self::PullRequest {
                    head: own,
                    target,
                    source,
                },
                Head::PullRequest(pr),
            ) => {
                own == pr
                    && !matches!(**source, Self::PullRequest { .. })
                    && source.is_on(head)
                    && target.is_on(&Head::Branch(pr.target.clone()))
            }
            (Self::PullRequest { .. }, Head::Branch(_)) => false,
        }
    }

    /// Returns the hash or changeset id to check out.
    ///
    /// For a pull request revision this is the source tip.
    pub fn hash(&self) -> &str {
        match self {
            Self::Commit { hash, .. } => hash,
            Self::Changeset { changeset_id, .. } => changeset_id,
            Self::PullRequest { source, .. } => source.hash(),
        }
    }

    /// Returns the target tip of a pull request revision.
    pub fn target_hash(&self) -> Option<&str> {
        match self {
            Self::PullRequest { target, .. } => Some(target.hash()),
            _ => None,
        }
    }

    /// Returns the backend the revision identifies content in.
    ///
    /// Pull request revisions take the backend of their source revision.
    pub fn backend(&self) -> BackendType {
        match self {
            Self::Commit { .. } => BackendType::Git,
            Self::Changeset { .. } => BackendType::Mercurial,
            Self::PullRequest { source, .. } => source.backend(),
        }
    }

    /// Checks that every part of the revision belongs to `backend`.
    pub(crate) fn is_backend(&self, backend: BackendType) -> bool {
        match self {
            Self::PullRequest { target, source, .. } => {
                target.is_backend(backend) && source.is_backend(backend)
            }
            _ => self.backend() == backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr_head() -> PullRequestHead {
        PullRequestHead {
            id: 3,
            origin_owner: "qa".to_string(),
            origin_repository: "qa-repo".to_string(),
            origin_branch: "qa-branch".to_string(),
            target: BranchHead::new("main", BackendType::Git),
            origin: Origin::Fork,
            strategy: CheckoutStrategy::Merge,
        }
    }

    #[test]
    fn test_pull_request_revision_hashes() {
        let pr = pr_head();
        let revision = Revision::pull_request(
            pr.clone(),
            Revision::commit(pr.target.clone(), "target-hash"),
            Revision::commit(pr.clone(), "source-hash"),
        );
        assert_eq!(revision.hash(), "source-hash");
        assert_eq!(revision.target_hash(), Some("target-hash"));
        assert!(revision.is_on(&Head::PullRequest(pr)));
        assert!(revision.is_backend(BackendType::Git));
        assert!(!revision.is_backend(BackendType::Mercurial));
    }

    #[test]
    fn test_commit_revision_on_other_head() {
        let revision = Revision::commit(BranchHead::new("main", BackendType::Git), "abc");
        assert!(!revision.is_on(&BranchHead::new("develop", BackendType::Git).into()));
        assert_eq!(revision.target_hash(), None);
    }

    #[test]
    fn test_pull_request_revision_with_foreign_target() {
        let pr = pr_head();
        let revision = Revision::pull_request(
            pr.clone(),
            Revision::commit(BranchHead::new("develop", BackendType::Git), "target-hash"),
            Revision::commit(pr.clone(), "source-hash"),
        );
        assert!(!revision.is_on(&Head::PullRequest(pr)));
    }

    #[test]
    fn test_nested_pull_request_revision() {
        let pr = pr_head();
        let inner = Revision::pull_request(
            pr.clone(),
            Revision::commit(pr.target.clone(), "target-hash"),
            Revision::commit(pr.clone(), "source-hash"),
        );
        let nested = Revision::pull_request(
            pr.clone(),
            Revision::commit(pr.target.clone(), "target-hash"),
            inner.clone(),
        );
        assert!(!nested.is_on(&Head::PullRequest(pr.clone())));

        let nested_target =
            Revision::pull_request(pr.clone(), inner, Revision::commit(pr.clone(), "source-hash"));
        assert!(!nested_target.is_on(&Head::PullRequest(pr)));
    }

    #[test]
    fn test_mixed_pull_request_revision_is_not_single_backend() {
        let pr = pr_head();
        let revision = Revision::pull_request(
            pr.clone(),
            Revision::changeset(pr.target.clone(), "cs"),
            Revision::commit(pr, "hash"),
        );
        assert!(!revision.is_backend(BackendType::Git));
        assert!(!revision.is_backend(BackendType::Mercurial));
    }
}
