//! Axum route handlers for the skills API.

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection, rejection::QueryRejection, Multipart, Query, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::corpus::resumes::{build_gap_reports, load_resumes, ResumeGapReport};
use crate::corpus::{DatasetInfo, Demand};
use crate::errors::AppError;
use crate::skills::gap::detect_gaps;
use crate::skills::models::SkillCounts;
use crate::skills::ranker::DemandRanks;
use crate::state::AppState;

/// Multipart field carrying the resume file.
pub const RESUME_FIELD: &str = "resume";

const DEFAULT_REPORT_LIMIT: usize = 50;
const MAX_REPORT_LIMIT: usize = 1000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SkillsDemandResponse {
    pub demand: SkillCounts,
    /// `null` when no jobs dataset was found.
    pub source: Option<DatasetInfo>,
    pub computed_at: DateTime<Utc>,
}

impl From<&Demand> for SkillsDemandResponse {
    fn from(demand: &Demand) -> Self {
        Self {
            demand: demand.snapshot.counts.clone(),
            source: demand.snapshot.source.clone(),
            computed_at: demand.snapshot.computed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DemandRankResponse {
    pub ranks: DemandRanks,
}

#[derive(Debug, Serialize)]
pub struct DetectGapResponse {
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeGapsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ResumeGapsResponse {
    pub total_resumes: usize,
    pub reports: Vec<ResumeGapReport>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /skills-demand
///
/// Skill mention counts across the jobs dataset, computed on first request.
pub async fn handle_skills_demand(
    State(state): State<AppState>,
) -> Result<Json<SkillsDemandResponse>, AppError> {
    let demand = state
        .demand
        .get_or_compute()
        .await
        .map_err(|e| AppError::Dataset(format!("Failed to compute skills demand: {e}")))?;
    Ok(Json(SkillsDemandResponse::from(demand.as_ref())))
}

/// POST /skills-demand/refresh
///
/// Drops the cached counts and recomputes them from the current dataset.
pub async fn handle_refresh_demand(
    State(state): State<AppState>,
) -> Result<Json<SkillsDemandResponse>, AppError> {
    let demand = state
        .demand
        .refresh()
        .await
        .map_err(|e| AppError::Dataset(format!("Failed to recompute skills demand: {e}")))?;
    Ok(Json(SkillsDemandResponse::from(demand.as_ref())))
}

/// GET /demand-rank
pub async fn handle_demand_rank(
    State(state): State<AppState>,
) -> Result<Json<DemandRankResponse>, AppError> {
    let demand = state
        .demand
        .get_or_compute()
        .await
        .map_err(|e| AppError::Dataset(format!("Failed to rank skills demand: {e}")))?;
    Ok(Json(DemandRankResponse {
        ranks: demand.ranks.clone(),
    }))
}

/// POST /detect-gap
///
/// Body: `{"skills": ["python", "sql"]}`. Returns required skills not in the
/// list, most in-demand first.
pub async fn handle_detect_gap(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DetectGapResponse>, AppError> {
    let skills = parse_skills_payload(&body)?;

    let demand = state
        .demand
        .get_or_compute()
        .await
        .map_err(|e| AppError::Dataset(format!("Failed to detect gaps: {e}")))?;

    let lexicon = state.matcher.lexicon();
    let missing_skills = detect_gaps(&skills, lexicon.required(), &demand.ranks, lexicon);

    Ok(Json(DetectGapResponse { missing_skills }))
}

/// POST /upload-resume
///
/// Multipart form with a plain-text file under the `resume` key.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().trim().to_string();
        if file_name.is_empty() {
            return Err(AppError::Validation(
                "Empty filename or no file content.".to_string(),
            ));
        }

        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read resume upload: {e}")))?;
        let skills: Vec<String> = state.matcher.match_bytes(&content).into_iter().collect();
        info!(
            file = %file_name,
            bytes = content.len(),
            skills = skills.len(),
            "Parsed uploaded resume"
        );

        return Ok(Json(UploadResumeResponse { skills }));
    }

    Err(AppError::Validation(format!(
        "No resume file uploaded (form key must be '{RESUME_FIELD}')."
    )))
}

/// GET /resume-gaps?limit=N
///
/// Gap report for each row of the resume dataset, in dataset order.
pub async fn handle_resume_gaps(
    State(state): State<AppState>,
    query: Result<Query<ResumeGapsQuery>, QueryRejection>,
) -> Result<Json<ResumeGapsResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_REPORT_LIMIT)
        .min(MAX_REPORT_LIMIT);

    let demand = state
        .demand
        .get_or_compute()
        .await
        .map_err(|e| AppError::Dataset(format!("Failed to compute skills demand: {e}")))?;

    let path = state.config.resume_csv.clone();
    let resumes = tokio::task::spawn_blocking(move || load_resumes(&path))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Dataset(format!("Failed to load resume dataset: {e}")))?;

    let reports = build_gap_reports(&resumes, &state.matcher, &demand.ranks, limit);

    Ok(Json(ResumeGapsResponse {
        total_resumes: resumes.len(),
        reports,
    }))
}

/// Pulls the `skills` list out of a `/detect-gap` body.
///
/// An empty body or absent `skills` key means "no skills". Non-string entries
/// are kept in their JSON text form.
fn parse_skills_payload(body: &[u8]) -> Result<Vec<String>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Request body must be JSON: {e}")))?;
    let object = payload
        .as_object()
        .ok_or_else(|| AppError::Validation("Request body must be a JSON object".to_string()))?;

    match object.get("skills") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()),
        Some(_) => Err(AppError::Validation(
            "'skills' must be a list of strings".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skills_payload_list() {
        let skills = parse_skills_payload(br#"{"skills": ["Python", "sql"]}"#).unwrap();
        assert_eq!(skills, vec!["Python", "sql"]);
    }

    #[test]
    fn test_parse_skills_payload_empty_body() {
        assert!(parse_skills_payload(b"").unwrap().is_empty());
        assert!(parse_skills_payload(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_skills_payload_missing_key() {
        assert!(parse_skills_payload(b"{}").unwrap().is_empty());
        assert!(parse_skills_payload(br#"{"skills": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_skills_payload_stringifies_non_strings() {
        let skills = parse_skills_payload(br#"{"skills": ["r", 42, true]}"#).unwrap();
        assert_eq!(skills, vec!["r", "42", "true"]);
    }

    #[test]
    fn test_parse_skills_payload_rejects_bad_shapes() {
        assert!(matches!(
            parse_skills_payload(b"not json"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_skills_payload(br#"["python"]"#),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_skills_payload(br#"{"skills": "python"}"#),
            Err(AppError::Validation(_))
        ));
    }
}
