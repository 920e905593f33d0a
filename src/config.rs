//! # Configuration Module
//!
//! Server settings from an optional YAML file, overridden by environment
//! variables, overridden again by command-line flags.
//!
//! ## File Format
//!
//! ```yaml
//! addr: "0.0.0.0:8080"
//! base_uri: "http://localhost:8080/"
//! workers: 4
//! default_content_type: "text/turtle"
//! ```
//!
//! Every key is optional.
//!
//! ## Environment Variables
//!
//! - `LDP_ADDR`: listen address
//! - `LDP_BASE_URI`: absolute URI of the root container
//! - `LDP_WORKERS`: number of request worker threads

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::vocab;

fn default_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_base_uri() -> String {
    "http://localhost:8080/".to_string()
}

fn default_workers() -> usize {
    4
}

fn default_content_type() -> String {
    vocab::TEXT_TURTLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_addr")]
    pub addr: String,
    /// Absolute URI of the root container; every resource URI starts with it
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// RDF media type served when the client states no preference
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            base_uri: default_base_uri(),
            workers: default_workers(),
            default_content_type: default_content_type(),
        }
    }
}

impl ServerConfig {
    /// Read a YAML file.
    ///
    /// # Errors
    ///
    /// Unreadable file or invalid YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// File (when given) or defaults, then environment overrides, then
    /// validation.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_file`] and [`ServerConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LDP_ADDR`, `LDP_BASE_URI` and `LDP_WORKERS`.
    ///
    /// # Errors
    ///
    /// `LDP_WORKERS` is not a number.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            env::var("LDP_ADDR").ok(),
            env::var("LDP_BASE_URI").ok(),
            env::var("LDP_WORKERS").ok(),
        )
    }

    fn apply_overrides(
        &mut self,
        addr: Option<String>,
        base_uri: Option<String>,
        workers: Option<String>,
    ) -> Result<()> {
        if let Some(addr) = addr {
            self.addr = addr;
        }
        if let Some(base_uri) = base_uri {
            self.base_uri = base_uri;
        }
        if let Some(workers) = workers {
            self.workers = workers
                .trim()
                .parse()
                .with_context(|| format!("LDP_WORKERS must be a number, got {workers:?}"))?;
        }
        Ok(())
    }

    /// Check the settings and normalize `base_uri` to end with `/`.
    ///
    /// # Errors
    ///
    /// `base_uri` is not an absolute http(s) URL, `workers` is zero, or
    /// `default_content_type` is not an RDF media type the server writes.
    pub fn validate(&mut self) -> Result<()> {
        if !self.base_uri.ends_with('/') {
            self.base_uri.push('/');
        }
        let url = Url::parse(&self.base_uri)
            .with_context(|| format!("base_uri {:?} is not an absolute URL", self.base_uri))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base_uri must use http or https, got {}", url.scheme());
        }
        if url.query().is_some() || url.fragment().is_some() {
            bail!("base_uri must not have a query or fragment");
        }
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        if !vocab::RDF_MEDIA_TYPES
            .iter()
            .any(|mt| mt.eq_ignore_ascii_case(&self.default_content_type))
        {
            bail!(
                "default_content_type must be one of {}, got {}",
                vocab::RDF_MEDIA_TYPES.join(", "),
                self.default_content_type
            );
        }
        Ok(())
    }

    /// Parsed `base_uri`. Call after [`ServerConfig::validate`].
    ///
    /// # Errors
    ///
    /// `base_uri` is not a URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_uri).context("invalid base_uri")
    }
}
