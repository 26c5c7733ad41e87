//
//  bitbucket-checkout
//  cli/plan.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Plan command - print the checkout configuration of a branch or pull request
//!
//! The configuration is computed the same way a build would compute it:
//! clone links come from `--clone-link` (as the Bitbucket API would report
//! them) or fall back to the canonical URLs of the repository.

use anyhow::{bail, Result};
use clap::Args;

use crate::config::Config;
use crate::output::OutputWriter;
use crate::scm::{
    BackendType, BranchHead, CheckoutConfiguration, CheckoutStrategy, CloneLinkTemplate,
    CloneLinks, CredentialKind, CredentialRef, GitCheckoutBuilder, Head,
    MercurialCheckoutBuilder, Origin, PullRequestHead, Revision, SourceContext, TransportProtocol,
};

use super::{backend, parse_repo_arg, GlobalOptions};

/// Print the checkout configuration of a branch or pull request
#[derive(Args, Debug)]
pub struct PlanCommand {
    /// Target repository in WORKSPACE/REPO or PROJECT/REPO format
    pub repo: String,

    /// Mercurial repository
    #[arg(long)]
    pub hg: bool,

    /// Branch to check out
    #[arg(long, short = 'b', conflicts_with = "pr", required_unless_present = "pr")]
    pub branch: Option<String>,

    /// Pull request ID to check out
    #[arg(long, requires_all = ["from", "from_branch", "target"])]
    pub pr: Option<u64>,

    /// Repository the pull request comes from, in OWNER/REPO format
    #[arg(long, requires = "pr")]
    pub from: Option<String>,

    /// Source branch of the pull request
    #[arg(long, requires = "pr")]
    pub from_branch: Option<String>,

    /// Target branch of the pull request
    #[arg(long, requires = "pr")]
    pub target: Option<String>,

    /// Build the pull request merged onto its target
    #[arg(long, requires = "pr")]
    pub merge: bool,

    /// Git commit to pin
    #[arg(long, short = 'c', conflicts_with = "changeset")]
    pub commit: Option<String>,

    /// Mercurial changeset to pin
    #[arg(long)]
    pub changeset: Option<String>,

    /// Target tip the pull request was discovered with
    #[arg(long, requires = "pr")]
    pub target_commit: Option<String>,

    /// Credential ID to check out with, overriding the configured one
    #[arg(long)]
    pub credential: Option<String>,

    /// The credential is an SSH key
    #[arg(long, requires = "credential")]
    pub ssh_key: bool,

    /// Clone link of the target repository, e.g. ssh=git@bitbucket.org:owner/repo.git
    #[arg(long = "clone-link", value_name = "PROTO=URL", value_parser = parse_clone_link)]
    pub clone_links: Vec<CloneLinkTemplate>,

    /// Do not attach clone links
    #[arg(long, conflicts_with = "clone_links")]
    pub unresolved: bool,
}

impl PlanCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let checkout = self.plan(&config, global)?;
        OutputWriter::new(global.output_format()).write(&checkout)
    }

    /// Computes the checkout configuration without printing it.
    pub fn plan(&self, config: &Config, global: &GlobalOptions) -> Result<CheckoutConfiguration> {
        let (owner, repo) = parse_repo_arg(&self.repo)?;
        let mut context = SourceContext::new(global.deployment(config), owner, repo);
        if let Some(credential) = self.credential_ref(config) {
            context = context.with_credential(credential);
        }

        let backend = backend(self.hg);
        let head = self.head(&context, backend)?;
        let revision = self.revision(&head)?;
        let links = self.clone_links(&context, backend);

        let checkout = match backend {
            BackendType::Git => {
                let mut builder = GitCheckoutBuilder::new(context, head, revision)?;
                if let Some(links) = links {
                    builder = builder.with_clone_links(links?);
                }
                builder.build()?
            }
            BackendType::Mercurial => {
                let mut builder = MercurialCheckoutBuilder::new(context, head, revision)?;
                if let Some(links) = links {
                    builder = builder.with_clone_links(links?);
                }
                builder.build()?
            }
        };
        Ok(checkout)
    }

    fn credential_ref(&self, config: &Config) -> Option<CredentialRef> {
        match &self.credential {
            Some(id) => Some(CredentialRef {
                id: id.clone(),
                kind: if self.ssh_key {
                    CredentialKind::SshKey
                } else {
                    CredentialKind::UsernamePassword
                },
            }),
            None => config.credential(),
        }
    }

    fn head(&self, context: &SourceContext, backend: BackendType) -> Result<Head> {
        let (Some(id), Some(from), Some(from_branch), Some(target)) =
            (self.pr, &self.from, &self.from_branch, &self.target)
        else {
            return match &self.branch {
                Some(branch) => Ok(BranchHead::new(branch, backend).into()),
                None => bail!("Either --branch or --pr with --from, --from-branch and --target is required"),
            };
        };

        let (origin_owner, origin_repository) = parse_repo_arg(from)?;
        let origin = if context.is_repository(&origin_owner, &origin_repository) {
            Origin::Same
        } else {
            Origin::Fork
        };

        Ok(PullRequestHead {
            id,
            origin_owner,
            origin_repository,
            origin_branch: from_branch.clone(),
            target: BranchHead::new(target, backend),
            origin,
            strategy: if self.merge {
                CheckoutStrategy::Merge
            } else {
                CheckoutStrategy::Head
            },
        }
        .into())
    }

    fn revision(&self, head: &Head) -> Result<Option<Revision>> {
        let make: fn(Head, String) -> Revision = if self.changeset.is_some() {
            |head: Head, id: String| Revision::changeset(head, id)
        } else {
            |head: Head, id: String| Revision::commit(head, id)
        };
        let Some(id) = self.commit.as_ref().or(self.changeset.as_ref()) else {
            if self.target_commit.is_some() {
                bail!("--target-commit needs --commit or --changeset");
            }
            return Ok(None);
        };

        match head {
            Head::Branch(_) => Ok(Some(make(head.clone(), id.clone()))),
            Head::PullRequest(pr) => {
                let Some(target) = &self.target_commit else {
                    bail!("--target-commit is required when pinning a pull request");
                };
                Ok(Some(Revision::pull_request(
                    pr.clone(),
                    make(pr.target.clone().into(), target.clone()),
                    make(head.clone(), id.clone()),
                )))
            }
        }
    }

    fn clone_links(
        &self,
        context: &SourceContext,
        backend: BackendType,
    ) -> Option<Result<CloneLinks>> {
        if self.unresolved {
            return None;
        }
        if !self.clone_links.is_empty() {
            return Some(Ok(CloneLinks::new(self.clone_links.iter().cloned())));
        }
        Some(
            CloneLinks::fallback(
                &context.owner,
                &context.repository,
                backend,
                &context.deployment,
            )
            .map_err(Into::into),
        )
    }
}

/// Parses a `PROTO=URL` clone link.
fn parse_clone_link(s: &str) -> Result<CloneLinkTemplate, String> {
    let (protocol, url) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PROTO=URL, got '{}'", s))?;
    let protocol = match protocol.to_lowercase().as_str() {
        "https" | "http" => TransportProtocol::Https,
        "ssh" => TransportProtocol::Ssh,
        other => return Err(format!("unknown clone protocol '{}'", other)),
    };
    Ok(CloneLinkTemplate {
        protocol,
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::scm::{CheckoutError, HgRevisionKind, PinDirective};
    use clap::Parser;

    fn plan(args: &[&str]) -> Result<CheckoutConfiguration> {
        let cli = Cli::try_parse_from(std::iter::once("bb-checkout").chain(args.iter().copied()))?;
        match cli.command {
            Commands::Plan(cmd) => cmd.plan(&Config::default(), &cli.global),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_clone_link() {
        let link = parse_clone_link("http=https://bitbucket.org/a/b.git").unwrap();
        assert_eq!(link.protocol, TransportProtocol::Https);
        assert_eq!(link.url, "https://bitbucket.org/a/b.git");
        assert!(parse_clone_link("ftp=x").is_err());
        assert!(parse_clone_link("no-separator").is_err());
    }

    #[test]
    fn test_plan_branch_with_fallback_links() {
        let checkout = plan(&["plan", "tester/test-repo", "--branch", "main"]).unwrap();
        assert_eq!(checkout.remotes[0].url, "https://bitbucket.org/tester/test-repo.git");
        assert_eq!(
            checkout.remotes[0].refspec.as_deref(),
            Some("+refs/heads/main:refs/remotes/origin/main")
        );
        assert_eq!(checkout.pin, None);
    }

    #[test]
    fn test_plan_fork_pull_request_over_ssh() {
        let checkout = plan(&[
            "plan",
            "tester/test-repo",
            "--pr",
            "1",
            "--from",
            "qa/qa-repo",
            "--from-branch",
            "qa-branch",
            "--target",
            "test-branch",
            "--merge",
            "--credential",
            "key",
            "--ssh-key",
            "--clone-link",
            "ssh=ssh://git@bitbucket.org/tester/test-repo.git",
        ])
        .unwrap();
        assert_eq!(checkout.remotes[0].url, "git@bitbucket.org:qa/qa-repo.git");
        assert_eq!(checkout.remotes[1].url, "git@bitbucket.org:tester/test-repo.git");
        assert_eq!(
            checkout.merge.map(|m| m.base_remote_ref),
            Some("remotes/upstream/test-branch".to_string())
        );
    }

    #[test]
    fn test_plan_pinned_pull_request_needs_target_commit() {
        let err = plan(&[
            "plan",
            "tester/test-repo",
            "--pr",
            "1",
            "--from",
            "tester/test-repo",
            "--from-branch",
            "feature",
            "--target",
            "main",
            "--commit",
            "abc",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("--target-commit"));
    }

    #[test]
    fn test_plan_target_commit_needs_source_pin() {
        let err = plan(&[
            "plan",
            "tester/test-repo",
            "--pr",
            "1",
            "--from",
            "tester/test-repo",
            "--from-branch",
            "feature",
            "--target",
            "main",
            "--target-commit",
            "abc",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("--commit or --changeset"));
    }

    #[test]
    fn test_plan_mercurial_changeset() {
        let checkout = plan(&[
            "plan",
            "tester/test-repo",
            "--hg",
            "--branch",
            "default",
            "--changeset",
            "0123abcd",
        ])
        .unwrap();
        assert_eq!(
            checkout.pin,
            Some(PinDirective::Mercurial {
                kind: HgRevisionKind::Changeset,
                value: "0123abcd".to_string(),
            })
        );
    }

    #[test]
    fn test_plan_mercurial_on_server_fails() {
        let err = plan(&[
            "plan",
            "PROJ/repo",
            "--host",
            "bitbucket.test",
            "--hg",
            "--branch",
            "default",
        ])
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CheckoutError>(),
            Some(&CheckoutError::UnsupportedBackend {
                backend: BackendType::Mercurial
            })
        );
    }

    #[test]
    fn test_plan_unresolved_uses_root() {
        let checkout = plan(&["plan", "tester/test-repo", "--branch", "main", "--unresolved"]).unwrap();
        assert_eq!(checkout.remotes[0].url, "https://bitbucket.org");
    }

    #[test]
    fn test_plan_requires_head() {
        assert!(plan(&["plan", "tester/test-repo"]).is_err());
    }
}
