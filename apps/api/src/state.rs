use std::sync::Arc;

use crate::config::Config;
use crate::corpus::DemandCache;
use crate::skills::matcher::SkillMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Compiled once at startup from the configured lexicon.
    pub matcher: SkillMatcher,
    /// Lazily computed jobs-corpus demand. Shared by every handler.
    pub demand: Arc<DemandCache>,
}
