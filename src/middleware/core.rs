use std::sync::Arc;

use crate::dispatcher::{Dispatcher, LdpRequest, LdpResponse};
use crate::error::RequestError;

use super::{
    ContentNegotiationMiddleware, ErrorsMiddleware, RequestsMiddleware, ResponsesMiddleware,
    TracingMiddleware,
};

/// Innermost stage: resolves the request to a response, usually with a
/// resource instance as the body.
pub trait Application: Send + Sync {
    fn call(&self, req: &LdpRequest) -> Result<LdpResponse, RequestError>;
}

impl<F> Application for F
where
    F: Fn(&LdpRequest) -> Result<LdpResponse, RequestError> + Send + Sync,
{
    fn call(&self, req: &LdpRequest) -> Result<LdpResponse, RequestError> {
        self(req)
    }
}

/// One stage of the chain. A stage receives the request and the rest of
/// the chain, and decides what to do before and after running it.
pub trait Middleware: Send + Sync {
    fn call(&self, req: &LdpRequest, next: Next<'_>) -> Result<LdpResponse, RequestError>;
}

/// The stages inside the current one, ending at the application.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    stages: &'a [Arc<dyn Middleware>],
    app: &'a dyn Application,
}

impl<'a> Next<'a> {
    /// Run the remaining stages.
    ///
    /// # Errors
    ///
    /// Whatever an inner stage or the application returns.
    pub fn run(self, req: &LdpRequest) -> Result<LdpResponse, RequestError> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.call(
                req,
                Next {
                    stages: rest,
                    app: self.app,
                },
            ),
            None => self.app.call(req),
        }
    }
}

/// An ordered pipeline of stages around an application, outermost first.
#[derive(Clone)]
pub struct Chain {
    stages: Vec<Arc<dyn Middleware>>,
    app: Arc<dyn Application>,
}

impl Chain {
    /// A chain with no stages.
    #[must_use]
    pub fn new(app: Arc<dyn Application>) -> Self {
        Self {
            stages: Vec::new(),
            app,
        }
    }

    /// The protocol chain in its fixed order: tracing, content negotiation,
    /// errors, responses, requests, then `app`.
    ///
    /// `default_content_type` is served when the client expresses no
    /// preference.
    #[must_use]
    pub fn recommended(
        app: Arc<dyn Application>,
        dispatcher: Dispatcher,
        default_content_type: &str,
    ) -> Self {
        Self::new(app)
            .with(Arc::new(TracingMiddleware))
            .with(Arc::new(ContentNegotiationMiddleware::new(
                default_content_type,
            )))
            .with(Arc::new(ErrorsMiddleware))
            .with(Arc::new(ResponsesMiddleware))
            .with(Arc::new(RequestsMiddleware::new(dispatcher)))
    }

    /// Append a stage inside every stage added so far.
    #[must_use]
    pub fn with(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Number of stages, not counting the application.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run the whole chain.
    ///
    /// # Errors
    ///
    /// Only errors no stage converted; with the recommended chain the
    /// `Errors` stage converts every protocol error.
    pub fn handle(&self, req: &LdpRequest) -> Result<LdpResponse, RequestError> {
        Next {
            stages: &self.stages,
            app: self.app.as_ref(),
        }
        .run(req)
    }
}
