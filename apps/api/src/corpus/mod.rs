// Corpus loading: jobs dataset → skill counts, lazily cached; resume dataset → batch gap reports.
// File I/O and CSV parsing run inside tokio::task::spawn_blocking.

pub mod cache;
pub mod dataset;
pub mod resumes;

use std::path::PathBuf;

use thiserror::Error;

pub use cache::{CsvCorpusSource, Demand, DemandCache};
pub use dataset::DatasetInfo;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Corpus task failed: {0}")]
    Task(String),
}
