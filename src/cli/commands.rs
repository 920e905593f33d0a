use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::ServerConfig;
use crate::link_header;
use crate::logging::{init_logging_with_config, LogConfig};
use crate::resource::interaction_model;
use crate::server::{HttpServer, LdpService};

/// Command-line interface for the LDP server
#[derive(Parser)]
#[command(name = "ldp-server", version)]
#[command(about = "Linked Data Platform server", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server with an in-memory repository
    Serve {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address, overrides the file and LDP_ADDR
        #[arg(long)]
        addr: Option<String>,

        /// Root container URI, overrides the file and LDP_BASE_URI
        #[arg(long)]
        base_uri: Option<String>,

        /// Worker threads, overrides the file and LDP_WORKERS
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Print the interaction model a set of Link headers requests
    Resolve {
        /// Link header values, e.g. '<http://www.w3.org/ns/ldp#BasicContainer>; rel="type"'
        #[arg(required = true)]
        links: Vec<String>,

        /// Print JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Parse the process arguments and run the chosen command.
///
/// # Errors
///
/// Invalid configuration, a port that cannot be bound, or a conflicting
/// set of interaction models for `resolve`.
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

/// Run an already parsed command line.
///
/// # Errors
///
/// See [`run_cli`].
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            addr,
            base_uri,
            workers,
        } => {
            let _guard = init_logging_with_config(&LogConfig::from_env())?;
            let config = serve_config(config, addr, base_uri, workers)?;
            let service = LdpService::from_config(&config)?;
            let handle = HttpServer::new(service, config.workers)
                .start(config.addr.as_str())
                .with_context(|| format!("failed to bind {}", config.addr))?;
            info!(addr = %handle.local_addr(), "ldp-server ready");
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("a worker thread panicked"))
        }
        Commands::Resolve { links, json } => {
            println!("{}", resolve_output(&links, json)?);
            Ok(())
        }
    }
}

fn serve_config(
    path: Option<PathBuf>,
    addr: Option<String>,
    base_uri: Option<String>,
    workers: Option<usize>,
) -> Result<ServerConfig> {
    let mut config = ServerConfig::load(path.as_deref())?;
    if let Some(addr) = addr {
        config.addr = addr;
    }
    if let Some(base_uri) = base_uri {
        config.base_uri = base_uri;
    }
    if let Some(workers) = workers {
        config.workers = workers;
    }
    config.validate()?;
    Ok(config)
}

pub(crate) fn resolve_output(links: &[String], json: bool) -> Result<String> {
    let entries = link_header::parse_all(links.iter().map(String::as_str));
    let kind = interaction_model::resolve(&entries)?;
    if json {
        let caps = kind.capabilities();
        Ok(serde_json::json!({
            "kind": kind,
            "uri": kind.uri(),
            "container": caps.container,
            "rdf_source": caps.rdf_source,
            "non_rdf_source": caps.non_rdf_source,
        })
        .to_string())
    } else {
        Ok(format!("{kind} <{}>", kind.uri()))
    }
}
