#![allow(dead_code)]

//! Demand Ranker: turns corpus counts into a 1-based demand ordering.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::skills::models::SkillCounts;

/// Rank per skill token. 1 is the most mentioned skill.
///
/// Required skills never seen in the corpus are present but unranked; they
/// serialize as `0` and sort after every ranked skill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandRanks {
    order: Vec<String>,
    ranks: HashMap<String, Option<u32>>,
}

impl DemandRanks {
    /// `None` for unranked or unknown tokens.
    pub fn get(&self, token: &str) -> Option<u32> {
        self.ranks.get(token).copied().flatten()
    }

    /// Wire value: the rank, or 0 when unranked.
    pub fn value(&self, token: &str) -> u32 {
        self.get(token).unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.ranks.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<u32>)> {
        self.order
            .iter()
            .map(|token| (token.as_str(), self.get(token)))
    }

    fn insert(&mut self, token: &str, rank: Option<u32>) {
        if self.ranks.insert(token.to_string(), rank).is_none() {
            self.order.push(token.to_string());
        }
    }
}

impl Serialize for DemandRanks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (token, rank) in self.iter() {
            map.serialize_entry(token, &rank.unwrap_or(0))?;
        }
        map.end()
    }
}

/// Ranks every counted token by descending count (ties keep first-encountered
/// order), then adds each `required` token missing from `counts` as unranked.
pub fn rank(counts: &SkillCounts, required: &[String]) -> DemandRanks {
    let mut ranks = DemandRanks::default();
    for (position, (token, _)) in counts.most_common().into_iter().enumerate() {
        ranks.insert(token, Some(position as u32 + 1));
    }
    for token in required {
        if !ranks.contains(token) {
            ranks.insert(token, None);
        }
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_empty_counts_rank_everything_zero() {
        let req = required(&["python", "r", "sql"]);
        let ranks = rank(&SkillCounts::new(), &req);
        assert_eq!(ranks.len(), 3);
        for token in &req {
            assert_eq!(ranks.value(token), 0);
            assert_eq!(ranks.get(token), None);
        }
    }

    #[test]
    fn test_ranks_by_descending_count() {
        let counts: SkillCounts = [("python", 10), ("sql", 5)].into_iter().collect();
        let ranks = rank(&counts, &required(&["python", "r", "sql"]));
        assert_eq!(ranks.value("python"), 1);
        assert_eq!(ranks.value("sql"), 2);
        assert_eq!(ranks.value("r"), 0);
        assert_eq!(ranks.get("r"), None);
    }

    #[test]
    fn test_ties_keep_first_encountered_order() {
        let counts: SkillCounts = [("aws", 4), ("excel", 4), ("python", 9)]
            .into_iter()
            .collect();
        let ranks = rank(&counts, &required(&["excel", "aws"]));
        assert_eq!(ranks.value("python"), 1);
        assert_eq!(ranks.value("aws"), 2);
        assert_eq!(ranks.value("excel"), 3);
    }

    #[test]
    fn test_counted_non_required_tokens_are_ranked() {
        let counts: SkillCounts = [("pandas", 7), ("sql", 2)].into_iter().collect();
        let ranks = rank(&counts, &required(&["sql"]));
        assert_eq!(ranks.value("pandas"), 1);
        assert_eq!(ranks.value("sql"), 2);
    }

    #[test]
    fn test_serializes_unranked_as_zero() {
        let counts: SkillCounts = [("sql", 2)].into_iter().collect();
        let ranks = rank(&counts, &required(&["python", "sql"]));
        let json = serde_json::to_string(&ranks).unwrap();
        assert_eq!(json, r#"{"sql":1,"python":0}"#);
    }
}
