use std::collections::HashMap;
use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_gateway::PracticeClient;

use crate::error::ScheduleFillError;
use crate::models::{Candidate, PreviewOption};
use crate::services::enrich::{minutes_rounded, parse_flexible_timestamp};

static DEEP_LINK_PROVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/appointments/doctor/([^/?#]+)").expect("static pattern"));

static DAY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern"));

#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    pub id: Uuid,
    pub display_name: String,
}

/// Process-lifetime external id -> internal provider mapping. Populated
/// lazily, never invalidated; failed resolutions are not cached so a later
/// attempt may retry.
#[derive(Default)]
pub struct ProviderIdCache {
    map: RwLock<HashMap<String, ResolvedProvider>>,
}

impl ProviderIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, external_id: &str) -> Option<ResolvedProvider> {
        self.map.read().await.get(external_id).cloned()
    }

    pub async fn put(&self, external_id: String, provider: ResolvedProvider) {
        self.map.write().await.insert(external_id, provider);
    }
}

/// Resolves a chosen candidate into the data needed to render a provisional
/// ("virtual") appointment in the provider's day plan.
pub struct PreviewService {
    gateway: Arc<PracticeClient>,
    cache: ProviderIdCache,
}

impl PreviewService {
    pub fn new(gateway: Arc<PracticeClient>) -> Self {
        Self {
            gateway,
            cache: ProviderIdCache::new(),
        }
    }

    pub async fn resolve_preview(
        &self,
        candidate: &Candidate,
    ) -> Result<PreviewOption, ScheduleFillError> {
        let suggested_start = parse_flexible_timestamp(&candidate.proposed_start)
            .ok_or_else(|| ScheduleFillError::InvalidTimestamp(candidate.proposed_start.clone()))?;

        let external_id = parse_external_provider_id(&candidate.deep_link)?;
        let provider = self.resolve_provider(&external_id).await?;

        let insertion_index = insertion_index(candidate.hole_index);
        let target_date = normalize_target_date(suggested_start)?;
        let service_minutes = minutes_rounded(candidate.required_duration_seconds).max(1);

        Ok(PreviewOption {
            target_date,
            insertion_index,
            suggested_start,
            provider_id: provider.id,
            provider_name: provider.display_name,
            added_drive_seconds: candidate.added_drive_seconds,
            client_name: candidate.client_name.clone(),
            service_minutes,
            // The candidate's own coordinates, never borrowed from an
            // existing appointment.
            latitude: candidate.latitude,
            longitude: candidate.longitude,
        })
    }

    async fn resolve_provider(
        &self,
        external_id: &str,
    ) -> Result<ResolvedProvider, ScheduleFillError> {
        if let Some(provider) = self.cache.get(external_id).await {
            debug!(%external_id, "provider id cache hit");
            return Ok(provider);
        }

        let response: Value = self
            .gateway
            .request(
                Method::GET,
                &format!("/employees/external/{}", external_id),
                None,
            )
            .await?;

        let provider = extract_employee(&response)
            .ok_or_else(|| ScheduleFillError::UnresolvedProvider(external_id.to_string()))?;

        self.cache
            .put(external_id.to_string(), provider.clone())
            .await;

        Ok(provider)
    }
}

/// Pull the external provider id out of the candidate's deep link. The link
/// always routes through the day-schedule path.
pub fn parse_external_provider_id(deep_link: &str) -> Result<String, ScheduleFillError> {
    DEEP_LINK_PROVIDER
        .captures(deep_link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ScheduleFillError::UnparseableLink(deep_link.to_string()))
}

/// Hole indices are 1-based upstream; insertion indices are 0-based. A
/// malformed hole index of 0 (or below) clamps to the front of the day.
pub fn insertion_index(hole_index: i64) -> usize {
    usize::try_from(hole_index - 1).unwrap_or(0)
}

/// Strict `YYYY-MM-DD`. The preview consumer parses this without further
/// validation, so anything that does not match the pattern is an error here.
pub fn normalize_target_date(
    start: chrono::DateTime<chrono::Utc>,
) -> Result<String, ScheduleFillError> {
    let formatted = start.format("%Y-%m-%d").to_string();
    if DAY_FORMAT.is_match(&formatted) {
        Ok(formatted)
    } else {
        Err(ScheduleFillError::InvalidDateFormat(formatted))
    }
}

/// The employee lookup answers with a bare record, an array of records, or
/// a record nested under "employee". The internal id lives in "id".
fn extract_employee(value: &Value) -> Option<ResolvedProvider> {
    let record = match value.as_array() {
        Some(records) => records.first()?,
        None => value,
    };
    let record = record.get("employee").unwrap_or(record);

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<Uuid>().ok())?;

    let display_name = record
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            let first = record.get("first_name").and_then(Value::as_str)?;
            let last = record.get("last_name").and_then(Value::as_str)?;
            Some(format!("{} {}", first, last))
        })
        .unwrap_or_default();

    Some(ResolvedProvider { id, display_name })
}
