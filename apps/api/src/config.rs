use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::corpus::dataset::DEFAULT_TEXT_COLUMNS;
use crate::skills::lexicon::{Lexicon, LexiconFile};

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub jobs_dir: PathBuf,
    pub resume_csv: PathBuf,
    pub ui_dir: PathBuf,
    pub lexicon_path: Option<PathBuf>,
    /// Preferred descriptive column headers, lowercase.
    pub text_columns: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = PathBuf::from(var("DATA_DIR").unwrap_or_else(|| "data".to_string()));

        let text_columns = match var("TEXT_COLUMNS") {
            Some(raw) => {
                let columns: Vec<String> = raw
                    .split(',')
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect();
                anyhow::ensure!(
                    !columns.is_empty(),
                    "TEXT_COLUMNS must name at least one column"
                );
                columns
            }
            None => DEFAULT_TEXT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        };

        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            jobs_dir: var("JOBS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("jobs")),
            resume_csv: var("RESUME_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("cvs").join("UpdatedResumeDataSet.csv")),
            ui_dir: PathBuf::from(var("UI_DIR").unwrap_or_else(|| "ui".to_string())),
            lexicon_path: var("LEXICON_PATH").map(PathBuf::from),
            text_columns,
        })
    }

    /// The built-in lexicon, or the JSON file at `LEXICON_PATH`.
    pub fn load_lexicon(&self) -> Result<Lexicon> {
        let Some(path) = &self.lexicon_path else {
            return Ok(Lexicon::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        let file: LexiconFile = serde_json::from_str(&raw)
            .with_context(|| format!("Lexicon file {} is not valid JSON", path.display()))?;
        Lexicon::from_file(file)
            .with_context(|| format!("Lexicon file {} is invalid", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.jobs_dir, PathBuf::from("data/jobs"));
        assert_eq!(
            config.resume_csv,
            PathBuf::from("data/cvs/UpdatedResumeDataSet.csv")
        );
        assert_eq!(config.text_columns.len(), 4);
        assert!(config.lexicon_path.is_none());
    }

    #[test]
    fn test_data_dir_and_overrides() {
        let config = config_with(&[
            ("DATA_DIR", "/srv/data"),
            ("RESUME_CSV", "/tmp/r.csv"),
            ("TEXT_COLUMNS", " Summary , Duties,"),
        ])
        .unwrap();
        assert_eq!(config.jobs_dir, PathBuf::from("/srv/data/jobs"));
        assert_eq!(config.resume_csv, PathBuf::from("/tmp/r.csv"));
        assert_eq!(config.text_columns, vec!["summary", "duties"]);
    }

    #[test]
    fn test_invalid_port_fails() {
        assert!(config_with(&[("PORT", "http")]).is_err());
    }

    #[test]
    fn test_blank_text_columns_fails() {
        assert!(config_with(&[("TEXT_COLUMNS", " , ")]).is_err());
    }

    #[test]
    fn test_load_lexicon_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        std::fs::write(&path, r#"{"required": ["rust", "sql"], "tracked": ["go"]}"#).unwrap();
        let config = config_with(&[("LEXICON_PATH", path.to_str().unwrap())]).unwrap();
        let lexicon = config.load_lexicon().unwrap();
        assert_eq!(lexicon.required(), ["rust", "sql"]);
    }

    #[test]
    fn test_invalid_lexicon_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        std::fs::write(&path, r#"{"required": ["sql", "SQL"]}"#).unwrap();
        let config = config_with(&[("LEXICON_PATH", path.to_str().unwrap())]).unwrap();
        assert!(config.load_lexicon().is_err());
    }
}
