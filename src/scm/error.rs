//
//  bitbucket-checkout
//  scm/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Error type for checkout configuration resolution.
//!
//! Every error here is local to one discovery or build attempt and is never
//! retried: they describe static incompatibilities or contract violations,
//! not transient conditions.
//!
//! A builder without clone links is *not* an error. It answers URL queries
//! with the deployment root so callers can tell "not configured yet" apart
//! from "misconfigured".

use thiserror::Error;

use super::{BackendType, TransportProtocol};

/// Unified error type for checkout configuration resolution.
///
/// # Variants
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `UnsupportedBackend` | Mercurial is requested on Bitbucket Server |
/// | `MissingCloneLink` | Clone links are attached but none matches the credential's protocol |
/// | `InvalidHead` | A pull request's origin contradicts its same/fork flag |
/// | `BackendMismatch` | A head belongs to the other backend |
/// | `RevisionMismatch` | A revision was taken on another head or backend |
/// | `InvalidCloneLink` | A clone link URL cannot be parsed |
/// | `InvalidServerUrl` | A server root URL has no host |
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::scm::{
///     BackendType, CheckoutError, Deployment, RepositoryUriResolver, TransportProtocol,
/// };
///
/// let server = Deployment::server("https://bitbucket.example.com");
/// let resolver = RepositoryUriResolver::new(BackendType::Mercurial, &server);
///
/// match resolver.resolve("PROJ", "repo", TransportProtocol::Https) {
///     Err(CheckoutError::UnsupportedBackend { backend }) => {
///         assert_eq!(backend, BackendType::Mercurial);
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Bitbucket Server has no Mercurial hosting.
    #[error("Bitbucket Server does not host {backend} repositories")]
    UnsupportedBackend { backend: BackendType },

    /// The attached clone links have no template for the required protocol.
    ///
    /// The collaborator that fetched the links is expected to always deliver
    /// both protocols, so this points at an incomplete template set upstream.
    #[error("No {protocol} clone link available for this repository")]
    MissingCloneLink { protocol: TransportProtocol },

    /// A pull request head contradicts its own origin flag.
    #[error("Invalid head {head}: {reason}")]
    InvalidHead { head: String, reason: String },

    /// A head was handed to the builder of the other backend.
    #[error("Head {head} is a {actual} head, expected {expected}")]
    BackendMismatch {
        head: String,
        expected: BackendType,
        actual: BackendType,
    },

    /// A revision does not belong to the head or backend it was given with.
    #[error("Revision does not match head {head}: {reason}")]
    RevisionMismatch { head: String, reason: String },

    /// A clone link URL is neither URL form nor SCP-like form.
    #[error("Invalid clone link: {0}")]
    InvalidCloneLink(String),

    /// A server root URL has no host to derive SSH URLs from.
    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),
}
