#![allow(dead_code)]

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Occurrence count per canonical skill token.
///
/// Iteration follows first-encountered order, which is the tie-break the
/// ranker relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCounts {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl SkillCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one mention of `token`.
    pub fn record(&mut self, token: &str) {
        self.add(token, 1);
    }

    pub fn add(&mut self, token: &str, n: u64) {
        match self.index.get(token) {
            Some(&i) => self.entries[i].1 += n,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), n));
            }
        }
    }

    pub fn get(&self, token: &str) -> u64 {
        self.index
            .get(token)
            .map(|&i| self.entries[i].1)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(token, n)| (token.as_str(), *n))
    }

    /// Tokens by descending count; equal counts keep first-encountered order.
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut sorted: Vec<(&str, u64)> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for SkillCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (token, n) in iter {
            counts.add(token.as_ref(), n);
        }
        counts
    }
}

impl Serialize for SkillCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (token, n) in &self.entries {
            map.serialize_entry(token, n)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut counts = SkillCounts::new();
        counts.record("python");
        counts.record("sql");
        counts.record("python");
        assert_eq!(counts.get("python"), 2);
        assert_eq!(counts.get("sql"), 1);
        assert_eq!(counts.get("aws"), 0);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_common_is_stable_on_ties() {
        let counts: SkillCounts = [("sql", 3), ("r", 5), ("aws", 3), ("excel", 1)]
            .into_iter()
            .collect();
        let order: Vec<&str> = counts.most_common().into_iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["r", "sql", "aws", "excel"]);
    }

    #[test]
    fn test_serializes_in_first_encountered_order() {
        let counts: SkillCounts = [("sql", 1), ("aws", 4)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"sql":1,"aws":4}"#);
    }
}
