//
//  bitbucket-checkout
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod plan;
mod uri;

pub use plan::PlanCommand;
pub use uri::UriCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{Config, BITBUCKET_CLOUD};
use crate::output::OutputFormat;
use crate::scm::{BackendType, Deployment};

/// bb-checkout - Work out how to check out Bitbucket branches and pull requests
#[derive(Parser, Debug)]
#[command(
    name = "bb-checkout",
    version,
    about = "Work out how to check out Bitbucket branches and pull requests",
    long_about = "bb-checkout resolves clone URLs and checkout configurations for \
                  Bitbucket Cloud and Server/Data Center.\n\n\
                  It prints the remotes, refspecs, pins and merge steps a build \
                  would use, without touching any repository.",
    propagate_version = true,
    after_help = "Use 'bb-checkout <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Bitbucket host (for Server/DC)
    #[arg(long, global = true, env = "BB_HOST")]
    pub host: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }

    /// Maps `--host` to a deployment, defaulting to Bitbucket Cloud.
    pub fn deployment(&self, config: &Config) -> Deployment {
        config.deployment_for(self.host.as_deref().unwrap_or(BITBUCKET_CLOUD))
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the canonical clone URL of a repository
    Uri(UriCommand),

    /// Print the checkout configuration of a branch or pull request
    Plan(PlanCommand),

    /// Print version information
    Version,
}

/// Splits an `OWNER/REPO` argument.
pub(crate) fn parse_repo_arg(repo: &str) -> Result<(String, String)> {
    match repo.split_once('/') {
        Some((owner, slug)) if !owner.is_empty() && !slug.is_empty() && !slug.contains('/') => {
            Ok((owner.to_string(), slug.to_string()))
        }
        _ => anyhow::bail!(
            "Invalid repository format '{}'. Expected WORKSPACE/REPO or PROJECT/REPO",
            repo
        ),
    }
}

pub(crate) fn backend(hg: bool) -> BackendType {
    if hg {
        BackendType::Mercurial
    } else {
        BackendType::Git
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_repo_arg() {
        assert_eq!(
            parse_repo_arg("tester/test-repo").unwrap(),
            ("tester".to_string(), "test-repo".to_string())
        );
        assert!(parse_repo_arg("test-repo").is_err());
        assert!(parse_repo_arg("a/b/c").is_err());
        assert!(parse_repo_arg("/repo").is_err());
    }

    #[test]
    fn test_deployment_defaults_to_cloud() {
        let global = GlobalOptions::default();
        assert_eq!(global.deployment(&Config::default()), Deployment::Cloud);

        let global = GlobalOptions {
            host: Some("bitbucket.test".to_string()),
            json: false,
        };
        assert_eq!(
            global.deployment(&Config::default()),
            Deployment::server("https://bitbucket.test")
        );
    }
}
