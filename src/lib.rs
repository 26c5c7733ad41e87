//
//  bitbucket-checkout
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Checkout Library
//!
//! Computes how a build checks out a Bitbucket branch or pull request, for
//! Bitbucket Cloud and Bitbucket Server/Data Center.
//!
//! ## Overview
//!
//! Given the repository a build runs against, the head to build and
//! optionally the exact revision discovered for it, the library produces a
//! [`CheckoutConfiguration`](scm::CheckoutConfiguration): which remotes to
//! define, what to fetch, which commit or changeset to lock onto, whether
//! to merge onto a target branch, and where the repository's web page is.
//!
//! ## Module Structure
//!
//! - [`scm`]: Data model, URI resolver and the Git and Mercurial builders
//! - [`config`]: Configuration file management
//! - [`output`]: Output formatting (Table, JSON)
//! - [`cli`]: Command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust
//! use bitbucket_checkout::scm::{
//!     BackendType, BranchHead, CheckoutStrategy, CloneLinkTemplate, CloneLinks,
//!     CredentialRef, Deployment, GitCheckoutBuilder, Origin, PullRequestHead, SourceContext,
//! };
//!
//! let context = SourceContext::new(Deployment::Cloud, "tester", "test-repo")
//!     .with_credential(CredentialRef::ssh_key("deploy-key"));
//! let head = PullRequestHead {
//!     id: 1,
//!     origin_owner: "qa".to_string(),
//!     origin_repository: "qa-repo".to_string(),
//!     origin_branch: "qa-branch".to_string(),
//!     target: BranchHead::new("test-branch", BackendType::Git),
//!     origin: Origin::Fork,
//!     strategy: CheckoutStrategy::Merge,
//! };
//!
//! let config = GitCheckoutBuilder::new(context, head, None)?
//!     .with_clone_links(CloneLinks::new([CloneLinkTemplate::ssh(
//!         "ssh://git@bitbucket.org/tester/test-repo.git",
//!     )]))
//!     .build()?;
//!
//! assert_eq!(config.remotes[0].url, "git@bitbucket.org:qa/qa-repo.git");
//! assert_eq!(config.remotes[1].url, "git@bitbucket.org:tester/test-repo.git");
//! # Ok::<(), bitbucket_checkout::scm::CheckoutError>(())
//! ```
//!
//! ## Platform Differences
//!
//! | Feature | Cloud | Server/DC |
//! |---------|-------|-----------|
//! | Git | Yes | Yes |
//! | Mercurial | Yes | No |
//! | Pull request refs | source branch | `refs/pull-requests/{id}/from` |
//! | SSH URLs | SCP-like | `ssh://` with port |

/// Checkout configuration core.
///
/// Repository coordinates, heads and revisions, clone-link handling, and the
/// Git and Mercurial builders that turn them into a checkout configuration.
pub mod scm;

/// Configuration file management.
///
/// Manages the configuration stored in platform-specific locations:
/// - Linux: `~/.config/bb-checkout/config.toml`
/// - macOS: `~/Library/Application Support/bb-checkout/config.toml`
/// - Windows: `%APPDATA%\bb-checkout\config.toml`
pub mod config;

/// Output formatting for table and JSON modes.
pub mod output;

/// Command-line interface definitions.
pub mod cli;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use bitbucket_checkout::Cli;
///
/// let cli = Cli::parse();
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Re-export of the error type of every checkout operation.
pub use scm::CheckoutError;

/// Application name constant.
///
/// # Value
///
/// `"bb-checkout"`
pub const APP_NAME: &str = "bb-checkout";

/// Application version constant.
///
/// Derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use bitbucket_checkout::VERSION;
///
/// println!("bb-checkout version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_checkout::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::ERROR);
/// ```
pub mod exit_codes {
    /// Successful execution.
    ///
    /// # Value
    ///
    /// `0`
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// Resolution failed, e.g. Mercurial on Server or a missing clone link.
    /// Check stderr for details.
    ///
    /// # Value
    ///
    /// `1`
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// Reported by clap itself.
    ///
    /// # Value
    ///
    /// `2`
    pub const USAGE: i32 = 2;
}
