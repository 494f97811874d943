use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_gateway::PracticeClient;

use crate::error::ScheduleFillError;
use crate::models::{CandidateView, FillCandidatesResponse, RunStats};

/// Organizational policy, not a per-run preference: gap-fill runs always
/// accept an after-hours return to depot and the same tail-overtime cap.
pub const RETURN_TO_DEPOT_POLICY: &str = "afterHoursOk";
pub const TAIL_OVERTIME_MINUTES: i64 = 120;

/// Request/response wrapper over the external route optimizer. Stateless;
/// result retention lives on the `CandidateBoard`.
pub struct CandidateService {
    gateway: Arc<PracticeClient>,
}

impl CandidateService {
    pub fn new(gateway: Arc<PracticeClient>) -> Self {
        Self { gateway }
    }

    pub async fn fetch_candidates(
        &self,
        provider_id: Option<Uuid>,
        target_date: Option<NaiveDate>,
        ignore_reserve_blocks: bool,
    ) -> Result<FillCandidatesResponse, ScheduleFillError> {
        let provider_id = provider_id.ok_or_else(|| {
            ScheduleFillError::Validation("provider_id is required".to_string())
        })?;
        let target_date = target_date.ok_or_else(|| {
            ScheduleFillError::Validation("target_date is required".to_string())
        })?;

        debug!(%provider_id, %target_date, "fetching gap-fill candidates");

        let payload = json!({
            "providerId": provider_id,
            "targetDate": target_date,
            "ignoreReserveBlocks": ignore_reserve_blocks,
            "returnToDepotPolicy": RETURN_TO_DEPOT_POLICY,
            "tailOvertimeMinutes": TAIL_OVERTIME_MINUTES,
        });

        let response: FillCandidatesResponse = self
            .gateway
            .request(Method::POST, "/schedule/fill-candidates", Some(payload))
            .await?;

        debug!(
            holes = response.stats.holes_found,
            results = response.stats.final_results,
            "gap-fill run complete"
        );

        Ok(response)
    }
}

/// Ticket identifying one fetch attempt against the board's current
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Default)]
struct BoardInner {
    generation: u64,
    views: Vec<CandidateView>,
    stats: Option<RunStats>,
}

/// Holds the screen's current result set. Each fetch takes a ticket; a
/// result is applied wholesale only while its ticket is still current, so a
/// fetch that lands after the user moved on is discarded, never merged.
#[derive(Default)]
pub struct CandidateBoard {
    inner: RwLock<BoardInner>,
}

impl CandidateBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin_fetch(&self) -> FetchTicket {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        FetchTicket(inner.generation)
    }

    /// The user navigated away; anything still in flight is stale now.
    pub async fn invalidate(&self) {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
    }

    pub async fn apply(
        &self,
        ticket: FetchTicket,
        views: Vec<CandidateView>,
        stats: RunStats,
    ) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.0 != inner.generation {
            debug!("discarding stale candidate fetch result");
            return false;
        }
        inner.views = views;
        inner.stats = Some(stats);
        true
    }

    pub async fn snapshot(&self) -> (Vec<CandidateView>, Option<RunStats>) {
        let inner = self.inner.read().await;
        (inner.views.clone(), inner.stats.clone())
    }
}
