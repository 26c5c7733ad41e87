//
//  bitbucket-checkout
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads the `bb-checkout` configuration from a TOML file stored in the
//! platform-specific config directory.
//!
//! ## Overview
//!
//! The configuration has two parts:
//!
//! - **Core Configuration**: the default checkout credential
//! - **Host Configuration**: per-host deployment settings for Server/DC
//!   instances (web root URL and SSH port)
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bb-checkout/config.toml`
//! - **macOS**: `~/Library/Application Support/bb-checkout/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bb-checkout\config.toml`
//!
//! Setting `BB_CHECKOUT_CONFIG` points the loader at another file.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! credential = "ci-deploy-key"
//! credential_kind = "ssh"
//!
//! [hosts."bitbucket.mycompany.com"]
//! server_url = "https://bitbucket.mycompany.com/bitbucket"
//! ssh_port = 7999
//! ```
//!
//! ## Submodules
//!
//! - [`hosts`]: Host constants and normalization

mod hosts;

pub use hosts::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scm::{CredentialKind, CredentialRef, Deployment};

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "BB_CHECKOUT_CONFIG";

/// Global configuration container.
///
/// # Fields
///
/// * `core` - Default checkout credential
/// * `hosts` - Map of normalized hostname to host-specific configuration
///
/// # Examples
///
/// ```rust
/// use bitbucket_checkout::config::Config;
/// use bitbucket_checkout::scm::Deployment;
///
/// let config = Config::default();
/// assert!(config.credential().is_none());
/// assert_eq!(config.deployment_for("bitbucket.org"), Deployment::Cloud);
/// ```
///
/// # Notes
///
/// - All fields use `#[serde(default)]` so partial files load
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Core options.
    #[serde(default)]
    pub core: CoreConfig,

    /// Host-specific configuration map.
    ///
    /// Keys are hostnames (e.g., "bitbucket.mycompany.com"), values are the
    /// corresponding [`HostConfig`] settings for that host.
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

/// Core configuration options.
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `credential` | `None` (anonymous HTTPS) |
/// | `credential_kind` | `"password"` |
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CoreConfig {
    /// Identifier of the credential checkouts use by default.
    #[serde(default)]
    pub credential: Option<String>,

    /// Kind of the default credential.
    ///
    /// # Valid Values
    ///
    /// - `"password"` - Username and password or access token, clones over HTTPS
    /// - `"ssh"` - SSH private key, clones over SSH
    #[serde(default)]
    pub credential_kind: CredentialKind,
}

/// Host-specific configuration for a Bitbucket Server/Data Center instance.
///
/// Cloud hosts need no entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HostConfig {
    /// Web root URL, including any context path.
    ///
    /// Defaults to `https://<host>`.
    #[serde(default)]
    pub server_url: Option<String>,

    /// SSH port clones are served on, typically `7999`.
    #[serde(default)]
    pub ssh_port: Option<u16>,
}

impl Config {
    /// Loads configuration from `BB_CHECKOUT_CONFIG` or the default location.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration file exists but cannot be read
    /// - The configuration file contains invalid TOML or unknown values
    ///
    /// # Notes
    ///
    /// - A missing configuration file is not an error; defaults are used
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::config_path()?,
        };
        Self::load_from(&path)
    }

    /// Loads configuration from `path`, using defaults if it does not exist.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::path::Path;
    /// use bitbucket_checkout::config::Config;
    ///
    /// let config = Config::load_from(Path::new("/nonexistent/config.toml"))?;
    /// assert_eq!(config, Config::default());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the platform config directory cannot be determined.
    ///
    /// # Notes
    ///
    /// - The file may not exist; this only returns where it would be
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the configuration for a specific host.
    ///
    /// The host is normalized before lookup, and so are the keys.
    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        let host = normalize_host(host);
        self.hosts
            .iter()
            .find(|(key, _)| normalize_host(key) == host)
            .map(|(_, config)| config)
    }

    /// Maps a host to its deployment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bitbucket_checkout::config::Config;
    /// use bitbucket_checkout::scm::Deployment;
    ///
    /// let config = Config::default();
    /// assert_eq!(
    ///     config.deployment_for("https://git.example.com/"),
    ///     Deployment::server("https://git.example.com"),
    /// );
    /// ```
    pub fn deployment_for(&self, host: &str) -> Deployment {
        let host = normalize_host(host);
        if is_cloud_host(&host) {
            return Deployment::Cloud;
        }

        let host_config = self.host_config(&host);
        let root_url = host_config
            .and_then(|c| c.server_url.clone())
            .unwrap_or_else(|| format!("https://{}", host));
        let deployment = Deployment::server(root_url);

        match host_config.and_then(|c| c.ssh_port) {
            Some(port) => deployment.with_ssh_port(port),
            None => deployment,
        }
    }

    /// Returns the default checkout credential, if one is configured.
    pub fn credential(&self) -> Option<CredentialRef> {
        self.core.credential.as_ref().map(|id| CredentialRef {
            id: id.clone(),
            kind: self.core.credential_kind,
        })
    }
}
