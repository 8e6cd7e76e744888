//! Text Matcher: whole-word, case-insensitive skill spotting over free text.

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;

use crate::skills::lexicon::Lexicon;
use crate::skills::models::SkillCounts;

/// Compiled alternation over every tracked surface form.
///
/// Cheap to clone; the pattern and lexicon are shared.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    pattern: Regex,
    lexicon: Arc<Lexicon>,
}

impl SkillMatcher {
    pub fn new(lexicon: Arc<Lexicon>) -> Result<Self, regex::Error> {
        let pattern = build_pattern(lexicon.tracked())?;
        Ok(Self { pattern, lexicon })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Sorted, deduplicated canonical tokens mentioned in `text`.
    pub fn match_text(&self, text: &str) -> BTreeSet<String> {
        self.pattern
            .find_iter(text)
            .map(|m| self.lexicon.normalize(m.as_str()))
            .collect()
    }

    /// Same as [`match_text`](Self::match_text) for raw bytes; invalid UTF-8 is dropped.
    pub fn match_bytes(&self, bytes: &[u8]) -> BTreeSet<String> {
        self.match_text(&decode_lossy(bytes))
    }

    /// Every mention counts, so repeated skills accumulate.
    pub fn count(&self, text: &str) -> SkillCounts {
        let mut counts = SkillCounts::new();
        for m in self.pattern.find_iter(text) {
            counts.record(&self.lexicon.normalize(m.as_str()));
        }
        counts
    }
}

/// `(?i)\b(?:power\s+bi|python|...)\b`, longest forms first so a multi-word
/// skill wins over any shorter entry sharing its prefix.
fn build_pattern(tracked: &[String]) -> Result<Regex, regex::Error> {
    let mut forms: Vec<&String> = tracked.iter().collect();
    forms.sort_by(|a, b| b.len().cmp(&a.len()));

    let alternatives: Vec<String> = forms
        .iter()
        .map(|form| {
            form.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();

    if alternatives.is_empty() {
        // Matches nothing.
        return Regex::new(r"\b\B");
    }
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))
}

/// Decodes UTF-8, silently dropping undecodable byte sequences.
pub fn decode_lossy(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}
