//
//  bitbucket-checkout
//  scm/checkout.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Checkout configuration handed to a version-control checkout executor.

use serde::Serialize;

use super::CredentialRef;

/// A remote to define and fetch from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteSpec {
    /// Remote name, e.g. `origin`
    pub name: String,
    /// Clone URL
    pub url: String,
    /// Fetch refspec (Git only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refspec: Option<String>,
    /// Credential to fetch with
    pub credential: Option<CredentialRef>,
}

/// Kind of Mercurial revision to update to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HgRevisionKind {
    /// Update to the tip of a named branch.
    Branch,
    /// Update to an exact changeset.
    Changeset,
}

/// What the checkout locks onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum PinDirective {
    /// Build exactly `commit_hash`, recorded as `branch_name`.
    Git {
        branch_name: String,
        commit_hash: String,
    },
    /// Update to a branch tip or a changeset.
    Mercurial { kind: HgRevisionKind, value: String },
}

/// Merge step of a pull request built with the merge strategy.
///
/// Without a `base_hash` the source is merged onto whatever the base ref
/// resolves to at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeDirective {
    /// Ref to merge onto, e.g. `remotes/upstream/main`
    pub base_remote_ref: String,
    /// Target commit observed at discovery time, if pinned
    pub base_hash: Option<String>,
}

/// Complete checkout configuration for one head.
///
/// # Fields
///
/// * `remotes` - Remotes to define; the first one holds the head's content
/// * `pin` - Revision lock, absent when the build tracks the branch tip
/// * `merge` - Merge step, present only for merge-strategy pull requests
/// * `browser_url` - Repository web page for repository browser links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutConfiguration {
    pub remotes: Vec<RemoteSpec>,
    pub pin: Option<PinDirective>,
    pub merge: Option<MergeDirective>,
    pub browser_url: String,
}

impl CheckoutConfiguration {
    /// Returns the remote called `name`.
    pub fn remote(&self, name: &str) -> Option<&RemoteSpec> {
        self.remotes.iter().find(|r| r.name == name)
    }
}
