use std::sync::Arc;

use crate::server::{
    client::{DirectoryService, StatisticsService},
    config::LookupConfig,
    service::{cache::Cache, lookup::LookupOrchestrator},
};

/// Shared state handed to every request handler.
///
/// Providers and the cache are constructed once at startup; each request builds a
/// short-lived [`LookupOrchestrator`] over them.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn DirectoryService>,
    pub statistics: Arc<dyn StatisticsService>,
    pub cache: Cache,
    pub lookup: Arc<LookupConfig>,
}

impl AppState {
    pub fn orchestrator(&self) -> LookupOrchestrator<'_> {
        LookupOrchestrator::new(
            self.directory.as_ref(),
            self.statistics.as_ref(),
            &self.cache,
            &self.lookup,
        )
    }
}
