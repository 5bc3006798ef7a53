use std::sync::Arc;

use crate::clients::parse::ParseService;
use crate::clients::store::ResumeStore;
use crate::config::Config;
use crate::workflow::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration. Not yet consumed by any handler.
    #[allow(dead_code)]
    pub config: Config,
    /// Parse service seam. Tests substitute an in-memory fake.
    pub parse: Arc<dyn ParseService>,
    /// Storage backend seam for persist, listing and download.
    pub store: Arc<dyn ResumeStore>,
    pub sessions: SessionRegistry,
}
