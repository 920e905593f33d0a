use std::sync::Arc;

use anyhow::Result;
use http::Method;
use tracing::{error, info};
use url::Url;

use super::response::health_response;
use crate::app::LdpApp;
use crate::config::ServerConfig;
use crate::dispatcher::{Dispatcher, LdpRequest, LdpResponse};
use crate::middleware::Chain;
use crate::repository::{MemoryRepository, Repository};

/// Path answered with the health document. The resource URI it maps to is
/// never created.
pub const HEALTH_PATH: &str = "/health";

/// Everything one request needs: the protocol chain, the repository it
/// runs against, and the base URI requests are resolved under.
#[derive(Clone)]
pub struct LdpService {
    chain: Chain,
    repository: Arc<dyn Repository>,
    base: Url,
}

impl LdpService {
    /// Wire the recommended chain around [`LdpApp`] for `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>, base: Url, default_content_type: &str) -> Self {
        let mut dispatcher = Dispatcher::new(Arc::clone(&repository)).with_root(base.as_str());
        if let Ok(health) = base.join(HEALTH_PATH) {
            dispatcher = dispatcher.reserve(health.as_str());
        }
        let app = Arc::new(LdpApp::new(dispatcher.clone()));
        Self {
            chain: Chain::recommended(app, dispatcher, default_content_type),
            repository,
            base,
        }
    }

    /// An in-memory server whose root container lives at the configured
    /// base URI.
    ///
    /// # Errors
    ///
    /// `base_uri` does not parse.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let base = config.base_url()?;
        let repository = Arc::new(MemoryRepository::with_root(base.as_str()));
        info!(base_uri = %base, "root container created");
        Ok(Self::new(repository, base, &config.default_content_type))
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    #[must_use]
    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    /// Answer one request. `GET /health` bypasses the chain.
    pub fn handle(&self, req: &LdpRequest) -> LdpResponse {
        if req.method == Method::GET && req.path == HEALTH_PATH {
            return health_response();
        }
        self.chain.handle(req).unwrap_or_else(|err| {
            // only reachable if a stage outside Errors fails
            error!(request_id = %req.request_id, error = %err, "unhandled protocol error");
            err.into_response()
        })
    }
}
