//! Resume dataset: pre-extracted resume text, one row per candidate, and the
//! batch gap report built over it.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::corpus::dataset::{read_table_from_path, select_text_columns, Table};
use crate::corpus::CorpusError;
use crate::skills::gap::detect_gaps;
use crate::skills::matcher::SkillMatcher;
use crate::skills::ranker::DemandRanks;

const RESUME_COLUMNS: &[&str] = &["resume", "resume_str", "resume text", "text"];
const CATEGORY_COLUMN: &str = "category";

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeRecord {
    /// Stable row label, e.g. `resume-0003`.
    pub label: String,
    pub category: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeGapReport {
    pub resume: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub found_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Loads resume rows from `path`. A missing file yields no rows.
pub fn load_resumes(path: &Path) -> Result<Vec<ResumeRecord>, CorpusError> {
    if !path.is_file() {
        info!("Resume dataset {} not found; no resumes loaded", path.display());
        return Ok(Vec::new());
    }
    let table = read_table_from_path(path)?;
    Ok(records_from_table(&table))
}

fn records_from_table(table: &Table) -> Vec<ResumeRecord> {
    let category = table.column_index(CATEGORY_COLUMN);
    let text_columns: Vec<usize> = select_text_columns(table, RESUME_COLUMNS)
        .into_iter()
        .filter(|&c| Some(c) != category)
        .collect();

    (0..table.rows.len())
        .map(|row| {
            let category = category
                .map(|c| table.cell(row, c).trim().to_string())
                .filter(|c| !c.is_empty());
            ResumeRecord {
                label: format!("resume-{:04}", row + 1),
                category,
                text: text_columns
                    .iter()
                    .map(|&c| table.cell(row, c))
                    .collect::<Vec<_>>()
                    .join("\n"),
            }
        })
        .collect()
}

/// Detects skills and gaps for up to `limit` resumes, in dataset order.
pub fn build_gap_reports(
    resumes: &[ResumeRecord],
    matcher: &SkillMatcher,
    ranks: &DemandRanks,
    limit: usize,
) -> Vec<ResumeGapReport> {
    let lexicon = matcher.lexicon();
    resumes
        .iter()
        .take(limit)
        .map(|resume| {
            let found = matcher.match_text(&resume.text);
            let missing_skills = detect_gaps(&found, lexicon.required(), ranks, lexicon);
            ResumeGapReport {
                resume: resume.label.clone(),
                category: resume.category.clone(),
                found_skills: found.into_iter().collect(),
                missing_skills,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::corpus::dataset::read_table;
    use crate::skills::lexicon::Lexicon;
    use crate::skills::models::SkillCounts;
    use crate::skills::ranker::rank;

    const RESUME_CSV: &str = "Category,Resume\n\
        Data Science,\"Skills: Python, SQL, Tableau and Power BI\"\n\
        HR,\"Recruiting, onboarding\"\n\
        ,\"R and Excel\"\n";

    fn matcher() -> SkillMatcher {
        SkillMatcher::new(Arc::new(Lexicon::default())).unwrap()
    }

    #[test]
    fn test_records_use_resume_and_category_columns() {
        let table = read_table(RESUME_CSV.as_bytes()).unwrap();
        let records = records_from_table(&table);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].label, "resume-0001");
        assert_eq!(records[0].category.as_deref(), Some("Data Science"));
        assert!(records[0].text.contains("Power BI"));
        assert_eq!(records[2].category, None);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = load_resumes(&dir.path().join("absent.csv")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UpdatedResumeDataSet.csv");
        std::fs::write(&path, RESUME_CSV).unwrap();
        assert_eq!(load_resumes(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_gap_reports_follow_demand() {
        let table = read_table(RESUME_CSV.as_bytes()).unwrap();
        let records = records_from_table(&table);
        let m = matcher();
        let counts: SkillCounts = [("aws", 9), ("excel", 4), ("python", 2)]
            .into_iter()
            .collect();
        let ranks = rank(&counts, m.lexicon().required());

        let reports = build_gap_reports(&records, &m, &ranks, 10);
        assert_eq!(reports.len(), 3);

        let first = &reports[0];
        assert_eq!(first.found_skills, vec!["powerbi", "python", "sql", "tableau"]);
        assert_eq!(first.missing_skills[0], "aws");
        assert_eq!(first.missing_skills[1], "excel");
        assert!(!first.missing_skills.contains(&"python".to_string()));

        let hr = &reports[1];
        assert!(hr.found_skills.is_empty());
        assert_eq!(hr.missing_skills.len(), m.lexicon().required().len());
        assert_eq!(hr.missing_skills[..3], ["aws", "excel", "python"]);
    }

    #[test]
    fn test_gap_reports_respect_limit() {
        let table = read_table(RESUME_CSV.as_bytes()).unwrap();
        let records = records_from_table(&table);
        let reports = build_gap_reports(&records, &matcher(), &DemandRanks::default(), 1);
        assert_eq!(reports.len(), 1);
    }
}
