//! Corpus Counter: locates the jobs dataset and tallies skill mentions across it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::CorpusError;
use crate::skills::matcher::{decode_lossy, SkillMatcher};
use crate::skills::models::SkillCounts;

/// Column headers that hold descriptive job text, compared trimmed and lowercased.
pub const DEFAULT_TEXT_COLUMNS: &[&str] = &[
    "job description",
    "description",
    "requirements",
    "responsibilities",
];

pub const DATASET_EXTENSION: &str = "csv";

/// Where a count snapshot came from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetInfo {
    pub file: PathBuf,
    pub rows: usize,
    pub text_columns: Vec<String>,
}

/// One computed Skill Count Table plus its provenance.
#[derive(Debug, Clone)]
pub struct CountSnapshot {
    pub counts: SkillCounts,
    /// `None` when no dataset file was found.
    pub source: Option<DatasetInfo>,
    pub computed_at: DateTime<Utc>,
}

impl CountSnapshot {
    pub fn empty() -> Self {
        Self {
            counts: SkillCounts::new(),
            source: None,
            computed_at: Utc::now(),
        }
    }
}

/// A CSV file read into memory. Ragged rows are padded with blanks.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Cell at (`row`, `column`); missing cells read as blank.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }
}

/// Lexicographically first file in `dir` with the given extension
/// (case-insensitive). A missing directory is not an error.
pub fn select_dataset(dir: &Path, extension: &str) -> Result<Option<PathBuf>, CorpusError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Dataset directory {} does not exist", dir.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(CorpusError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CorpusError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches_ext && path.is_file() {
            candidates.push(path);
        }
    }

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(candidates.into_iter().next())
}

/// Parses CSV bytes with a header row. Invalid UTF-8 is dropped, not rejected.
pub fn read_table(bytes: &[u8]) -> Result<Table, CorpusError> {
    let text = decode_lossy(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut values: Vec<String> = record.iter().map(str::to_string).collect();
        values.resize(headers.len().max(values.len()), String::new());
        rows.push(values);
    }

    Ok(Table { headers, rows })
}

pub fn read_table_from_path(path: &Path) -> Result<Table, CorpusError> {
    let bytes = std::fs::read(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(&bytes)
}

/// Indices of the preferred descriptive columns; if none are present, every
/// column that holds free-form text.
pub fn select_text_columns<S: AsRef<str>>(table: &Table, preferred: &[S]) -> Vec<usize> {
    let preferred: Vec<String> = preferred
        .iter()
        .map(|p| p.as_ref().trim().to_lowercase())
        .collect();

    let by_name: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| preferred.contains(&h.trim().to_lowercase()))
        .map(|(i, _)| i)
        .collect();
    if !by_name.is_empty() {
        return by_name;
    }

    (0..table.headers.len())
        .filter(|&column| is_text_column(table, column))
        .collect()
}

/// A column is free text when any non-blank cell is neither a number nor a boolean.
fn is_text_column(table: &Table, column: usize) -> bool {
    (0..table.rows.len())
        .map(|row| table.cell(row, column).trim())
        .filter(|cell| !cell.is_empty())
        .any(|cell| {
            cell.parse::<f64>().is_err()
                && !cell.eq_ignore_ascii_case("true")
                && !cell.eq_ignore_ascii_case("false")
        })
}

/// Joins each selected column's cells with newlines, then the columns with newlines.
pub fn concat_columns(table: &Table, columns: &[usize]) -> String {
    columns
        .iter()
        .map(|&column| {
            (0..table.rows.len())
                .map(|row| table.cell(row, column))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Counts skill mentions across the first dataset in `dir`.
///
/// No dataset yields an empty snapshot. Unreadable or structurally broken CSV
/// is an error.
pub fn compute_counts<S: AsRef<str>>(
    dir: &Path,
    preferred_columns: &[S],
    matcher: &SkillMatcher,
) -> Result<CountSnapshot, CorpusError> {
    let Some(path) = select_dataset(dir, DATASET_EXTENSION)? else {
        info!(
            "No .{DATASET_EXTENSION} dataset in {}; demand counts are empty",
            dir.display()
        );
        return Ok(CountSnapshot::empty());
    };
    info!("Using dataset {}", path.display());

    let table = read_table_from_path(&path)?;
    let columns = select_text_columns(&table, preferred_columns);
    let blob = concat_columns(&table, &columns);
    let counts = matcher.count(&blob);

    let text_columns: Vec<String> = columns.iter().map(|&i| table.headers[i].clone()).collect();
    debug!(
        rows = table.rows.len(),
        columns = ?text_columns,
        skills = counts.len(),
        "Counted skill mentions"
    );

    Ok(CountSnapshot {
        counts,
        source: Some(DatasetInfo {
            file: path,
            rows: table.rows.len(),
            text_columns,
        }),
        computed_at: Utc::now(),
    })
}
