//
//  bitbucket-checkout
//  cli/uri.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Uri command - print the canonical clone URL of a repository

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::config::Config;
use crate::output::OutputWriter;
use crate::scm::{RepositoryUriResolver, TransportProtocol};

use super::{backend, parse_repo_arg, GlobalOptions};

/// Print the canonical clone URL of a repository
#[derive(Args, Debug)]
pub struct UriCommand {
    /// Repository in WORKSPACE/REPO or PROJECT/REPO format
    pub repo: String,

    /// Mercurial repository
    #[arg(long)]
    pub hg: bool,

    /// Print the SSH URL instead of HTTPS
    #[arg(long)]
    pub ssh: bool,

    /// SSH port of the Server/DC instance, overriding the configured one
    #[arg(long)]
    pub ssh_port: Option<u16>,
}

impl UriCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let (owner, repo) = parse_repo_arg(&self.repo)?;

        let mut deployment = global.deployment(&config);
        if let Some(port) = self.ssh_port {
            deployment = deployment.with_ssh_port(port);
        }

        let protocol = if self.ssh {
            TransportProtocol::Ssh
        } else {
            TransportProtocol::Https
        };
        debug!("Resolving {} {} URL for {}/{}", backend(self.hg), protocol, owner, repo);

        let url = RepositoryUriResolver::new(backend(self.hg), &deployment)
            .resolve(&owner, &repo, protocol)?;

        OutputWriter::new(global.output_format()).write_line(&url)
    }
}
