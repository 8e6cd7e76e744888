//! Skill Lexicon: the canonical skill tokens the service tracks, plus synonym folding.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

/// Skills a candidate is measured against in gap analysis.
pub const DEFAULT_REQUIRED: &[&str] = &[
    "python", "r", "sql", "excel", "aws", "spark", "tableau", "hadoop", "sas", "azure",
];

/// Extra skills recognized in free text but never reported as gaps.
pub const DEFAULT_EXTRA_TRACKED: &[&str] =
    &["pandas", "numpy", "scikit-learn", "tensorflow", "power bi"];

pub const DEFAULT_SYNONYMS: &[(&str, &str)] = &[("power bi", "powerbi")];

#[derive(Debug, Error, PartialEq)]
pub enum LexiconError {
    #[error("Lexicon contains an empty skill token")]
    EmptyToken,

    #[error("Required skill '{0}' is listed more than once")]
    DuplicateRequired(String),

    #[error("Synonym '{0}' maps to an empty canonical token")]
    EmptySynonymTarget(String),
}

/// On-disk shape of a lexicon override (`LEXICON_PATH`).
#[derive(Debug, Clone, Deserialize)]
pub struct LexiconFile {
    pub required: Vec<String>,
    #[serde(default)]
    pub tracked: Vec<String>,
    #[serde(default)]
    pub synonyms: HashMap<String, String>,
}

/// Immutable skill vocabulary.
///
/// `required` is ordered and canonical. `tracked` holds every surface form the
/// matcher looks for (required tokens included); synonyms fold surface forms
/// onto one canonical token.
#[derive(Debug, Clone)]
pub struct Lexicon {
    required: Vec<String>,
    tracked: Vec<String>,
    synonyms: HashMap<String, String>,
}

impl Lexicon {
    pub fn new<R, T, S>(required: R, tracked: T, synonyms: S) -> Result<Self, LexiconError>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
        S: IntoIterator<Item = (String, String)>,
    {
        let mut synonym_table = HashMap::new();
        for (variant, canonical) in synonyms {
            let variant = fold(&variant);
            let canonical = fold(&canonical);
            if variant.is_empty() {
                return Err(LexiconError::EmptyToken);
            }
            if canonical.is_empty() {
                return Err(LexiconError::EmptySynonymTarget(variant));
            }
            synonym_table.insert(variant, canonical);
        }

        let mut required_tokens = Vec::new();
        let mut seen = HashSet::new();
        for token in required {
            let folded = fold(token.as_ref());
            if folded.is_empty() {
                return Err(LexiconError::EmptyToken);
            }
            let canonical = synonym_table.get(&folded).cloned().unwrap_or(folded);
            if !seen.insert(canonical.clone()) {
                return Err(LexiconError::DuplicateRequired(canonical));
            }
            required_tokens.push(canonical);
        }

        // Required tokens come first so they keep declaration order in the matcher.
        let mut tracked_tokens: Vec<String> = required_tokens.clone();
        let mut tracked_seen: HashSet<String> = required_tokens.iter().cloned().collect();
        for token in tracked {
            let folded = fold(token.as_ref());
            if folded.is_empty() {
                return Err(LexiconError::EmptyToken);
            }
            if tracked_seen.insert(folded.clone()) {
                tracked_tokens.push(folded);
            }
        }
        let mut pairs: Vec<(&String, &String)> = synonym_table.iter().collect();
        pairs.sort();
        for (variant, canonical) in pairs {
            for surface in [variant, canonical] {
                if tracked_seen.insert(surface.clone()) {
                    tracked_tokens.push(surface.clone());
                }
            }
        }

        Ok(Self {
            required: required_tokens,
            tracked: tracked_tokens,
            synonyms: synonym_table,
        })
    }

    pub fn from_file(file: LexiconFile) -> Result<Self, LexiconError> {
        Self::new(file.required, file.tracked, file.synonyms)
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Surface forms the matcher searches for.
    pub fn tracked(&self) -> &[String] {
        &self.tracked
    }

    /// Folds any spelling of a skill onto its canonical token.
    pub fn normalize(&self, raw: &str) -> String {
        let folded = fold(raw);
        match self.synonyms.get(&folded) {
            Some(canonical) => canonical.clone(),
            None => folded,
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            required: DEFAULT_REQUIRED.iter().map(|s| s.to_string()).collect(),
            tracked: DEFAULT_REQUIRED
                .iter()
                .chain(DEFAULT_EXTRA_TRACKED)
                .chain(DEFAULT_SYNONYMS.iter().map(|(_, canonical)| canonical))
                .map(|s| s.to_string())
                .collect(),
            synonyms: DEFAULT_SYNONYMS
                .iter()
                .map(|(v, c)| (v.to_string(), c.to_string()))
                .collect(),
        }
    }
}

/// Trim, lowercase, and collapse whitespace runs to a single space.
fn fold(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
