use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only projection of an overdue care reminder from the upstream
/// reminder system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePatient {
    pub id: String,
    #[serde(default)]
    pub external_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub weight_lbs: Option<f64>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub alert: Option<String>,
    /// Authoritative when present and non-empty; the candidate's flat
    /// reminder list is only a fallback for patients missing this.
    #[serde(default)]
    pub reminders: Option<Vec<Reminder>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAddress {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub full_address: String,
}

/// One provider+day gap-fill opportunity as produced by the external
/// route optimizer. Timestamps arrive as strings because the optimizer
/// emits them without a guaranteed offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub client_external_id: Option<String>,
    #[serde(default)]
    pub client_alert: Option<String>,
    pub address: CandidateAddress,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub patient_ids: Vec<String>,
    #[serde(default)]
    pub patient_names: Vec<String>,
    #[serde(default)]
    pub patients: Option<Vec<CandidatePatient>>,
    /// Legacy flat reminder shape, paired with `reminder_ids`.
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub reminder_ids: Vec<String>,
    pub proposed_start: String,
    pub window_start: String,
    pub window_end: String,
    pub required_duration_seconds: i64,
    #[serde(default)]
    pub added_drive_seconds: i64,
    /// 1-based index of the schedule gap this candidate fills.
    pub hole_index: i64,
    pub score: f64,
    pub deep_link: String,
    #[serde(default)]
    pub overdue_patient_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub holes_found: i64,
    pub candidates_evaluated: i64,
    pub shortlist_size: i64,
    pub final_results: i64,
}

/// Wire response from the route optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillCandidatesResponse {
    pub candidates: Vec<Candidate>,
    pub stats: RunStats,
    #[serde(default)]
    pub message: Option<String>,
}

/// Per-patient slice of the enriched candidate view.
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub name: String,
    pub descriptor: Option<String>,
    pub reminders: Vec<String>,
}

/// Render-ready candidate: the raw record plus everything the screen
/// derives from it.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub candidate: Candidate,
    pub patient_summaries: Vec<PatientSummary>,
    pub proposed_date_label: String,
    pub proposed_time_label: String,
    pub arrival_window_label: String,
    pub added_drive_minutes: i64,
}

/// Ephemeral provisional-appointment preview. Rebuilt on every request,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOption {
    pub target_date: String,
    pub insertion_index: usize,
    pub suggested_start: DateTime<Utc>,
    pub provider_id: Uuid,
    pub provider_name: String,
    pub added_drive_seconds: i64,
    pub client_name: String,
    pub service_minutes: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Per-client outreach send status, readable while other candidates are
/// being reviewed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendStatus {
    pub in_flight: bool,
    pub error: Option<String>,
    pub succeeded: bool,
}

// Request bodies for the cell's own HTTP surface.

#[derive(Debug, Clone, Deserialize)]
pub struct FetchCandidatesParams {
    pub provider_id: Option<Uuid>,
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub ignore_reserve_blocks: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenOutreachRequest {
    pub candidate: Candidate,
    #[serde(default)]
    pub override_non_prod: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditOutreachRequest {
    pub client_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutreachTargetRequest {
    pub client_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    pub candidate: Candidate,
}
