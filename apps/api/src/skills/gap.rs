//! Gap Detector: required skills a candidate lacks, most in-demand first.
//!
//! The single implementation behind both `/detect-gap` and the batch
//! resume-dataset report.

use std::collections::HashSet;

use crate::skills::lexicon::Lexicon;
use crate::skills::ranker::DemandRanks;

/// Returns `required` minus `candidate`, ordered by demand.
///
/// Candidate tokens are normalized with the lexicon before comparison. Ranked
/// skills come first (rank 1, then 2, ...), unranked ones last; the sort is
/// stable so equal keys keep their order from `required`. This is ascending
/// by rank number, not a descending sort on the raw rank value, which would
/// put the least demanded skill first.
pub fn detect_gaps<I, S>(
    candidate: I,
    required: &[String],
    ranks: &DemandRanks,
    lexicon: &Lexicon,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let have: HashSet<String> = candidate
        .into_iter()
        .map(|s| lexicon.normalize(s.as_ref()))
        .collect();

    let mut missing: Vec<String> = required
        .iter()
        .filter(|token| !have.contains(&lexicon.normalize(token)))
        .cloned()
        .collect();

    missing.sort_by_key(|token| ranks.get(token).unwrap_or(u32::MAX));
    missing
}
