//! Demand cache: the process-wide Skill Count Table, computed on first use.
//!
//! `AppState` owns one `DemandCache`; handlers reach it through `State`.
//! The loader sits behind the `CorpusSource` trait so tests can observe how
//! often the dataset is actually read.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::corpus::dataset::{compute_counts, CountSnapshot};
use crate::corpus::CorpusError;
use crate::skills::matcher::SkillMatcher;
use crate::skills::ranker::{rank, DemandRanks};

/// Produces a fresh count snapshot. Implementations must be deterministic for
/// an unchanged corpus.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    async fn load(&self) -> Result<CountSnapshot, CorpusError>;
}

/// Reads the first CSV in a directory.
pub struct CsvCorpusSource {
    dir: PathBuf,
    text_columns: Vec<String>,
    matcher: SkillMatcher,
}

impl CsvCorpusSource {
    pub fn new(dir: PathBuf, text_columns: Vec<String>, matcher: SkillMatcher) -> Self {
        Self {
            dir,
            text_columns,
            matcher,
        }
    }
}

#[async_trait]
impl CorpusSource for CsvCorpusSource {
    async fn load(&self) -> Result<CountSnapshot, CorpusError> {
        let dir = self.dir.clone();
        let columns = self.text_columns.clone();
        let matcher = self.matcher.clone();
        tokio::task::spawn_blocking(move || compute_counts(&dir, columns.as_slice(), &matcher))
            .await
            .map_err(|e| CorpusError::Task(e.to_string()))?
    }
}

/// Counts plus the rank table derived from them. Read-only once built.
#[derive(Debug)]
pub struct Demand {
    pub snapshot: CountSnapshot,
    pub ranks: DemandRanks,
}

pub struct DemandCache {
    source: Arc<dyn CorpusSource>,
    required: Vec<String>,
    slot: RwLock<Option<Arc<Demand>>>,
    // Held while the corpus is loaded so a cold cache is filled once.
    init: Mutex<()>,
}

impl DemandCache {
    pub fn new(source: Arc<dyn CorpusSource>, required: Vec<String>) -> Self {
        Self {
            source,
            required,
            slot: RwLock::new(None),
            init: Mutex::new(()),
        }
    }

    /// Returns the cached demand, computing it if the cache is cold.
    ///
    /// Warm reads only take the shared read lock. Concurrent callers on a cold
    /// cache queue on the init lock, so the corpus is loaded once. Failures
    /// are returned and leave the cache cold.
    pub async fn get_or_compute(&self) -> Result<Arc<Demand>, CorpusError> {
        if let Some(demand) = self.cached().await {
            return Ok(demand);
        }

        let _init = self.init.lock().await;
        if let Some(demand) = self.cached().await {
            return Ok(demand);
        }

        let snapshot = self.source.load().await.map_err(|e| {
            warn!("Could not compute skill demand yet: {e}");
            e
        })?;
        let ranks = rank(&snapshot.counts, &self.required);
        info!(
            skills = snapshot.counts.len(),
            source = ?snapshot.source.as_ref().map(|s| &s.file),
            "Skill demand cached"
        );

        let demand = Arc::new(Demand { snapshot, ranks });
        *self.slot.write().await = Some(Arc::clone(&demand));
        Ok(demand)
    }

    /// Drops the cached value; the next `get_or_compute` reloads the corpus.
    pub async fn invalidate(&self) {
        let _init = self.init.lock().await;
        if self.slot.write().await.take().is_some() {
            info!("Skill demand cache invalidated");
        }
    }

    pub async fn refresh(&self) -> Result<Arc<Demand>, CorpusError> {
        self.invalidate().await;
        self.get_or_compute().await
    }

    pub async fn is_warm(&self) -> bool {
        self.slot.read().await.is_some()
    }

    async fn cached(&self) -> Option<Arc<Demand>> {
        self.slot.read().await.as_ref().map(Arc::clone)
    }
}
