//! Paginated conversation history fetch and dashboard analytics.
//!
//! Pagination is cursor-based with a fixed page size and a hard cap on total
//! records, bounding both latency and memory for busy agents. Aggregation is
//! a pure function over whatever the fetch returned.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use frontdesk_core::domain::voice_agent::AgentId;

use crate::client::AgentProviderClient;
use crate::error::ProviderError;

pub const PAGE_SIZE: u32 = 100;
pub const MAX_RECORDS: usize = 1_000;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ConversationRecord {
    pub id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_seconds: u32,
    #[serde(default)]
    pub successful: bool,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConversationPage {
    conversations: Vec<ConversationRecord>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub total: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CallAnalytics {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub average_duration_seconds: f64,
    /// Averaged only over records that carry a rating.
    pub average_rating: Option<f64>,
    /// One bucket per day in the trailing window, oldest first, zero-filled.
    pub daily: Vec<DayBucket>,
}

impl AgentProviderClient {
    /// Fetches conversations within the trailing window. Stops at the
    /// provider's last page or at `MAX_RECORDS`, whichever comes first.
    pub async fn fetch_conversations(
        &self,
        credential: &str,
        agent_id: &AgentId,
        window_days: u32,
    ) -> Result<Vec<ConversationRecord>, ProviderError> {
        let since = Utc::now() - Duration::days(i64::from(window_days));
        let mut records: Vec<ConversationRecord> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(self.conversations_url(agent_id))
                .bearer_auth(credential)
                .query(&[
                    ("page_size", PAGE_SIZE.to_string()),
                    ("since", since.to_rfc3339()),
                ]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("cursor", cursor.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::from_status(status.as_u16(), body));
            }
            let page = response
                .json::<ConversationPage>()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string()))?;

            records.extend(page.conversations);
            if records.len() >= MAX_RECORDS {
                records.truncate(MAX_RECORDS);
                debug!(agent_id = %agent_id.0, "conversation fetch hit record cap");
                break;
            }
            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(records)
    }

    fn conversations_url(&self, agent_id: &AgentId) -> String {
        format!("{}/v1/agents/{}/conversations", self.base_url, agent_id.0)
    }
}

/// Handle for a running dashboard poll. Dropping it (or calling `stop`)
/// cancels the background task; nothing outlives the dashboard view.
pub struct AnalyticsPollHandle {
    task: tokio::task::JoinHandle<()>,
}

impl AnalyticsPollHandle {
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for AnalyticsPollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Re-runs the analytics fetch on a fixed interval while a dashboard view is
/// open. Fetch failures keep the previous value; the next tick retries.
pub fn spawn_analytics_poll(
    client: AgentProviderClient,
    credential: String,
    agent_id: AgentId,
    window_days: u32,
    interval: std::time::Duration,
) -> (
    tokio::sync::watch::Receiver<Option<CallAnalytics>>,
    AnalyticsPollHandle,
) {
    let (sender, receiver) = tokio::sync::watch::channel(None);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match client.fetch_conversations(&credential, &agent_id, window_days).await {
                Ok(records) => {
                    let analytics = aggregate_analytics(&records, window_days, Utc::now());
                    if sender.send(Some(analytics)).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    debug!(agent_id = %agent_id.0, error = %error, "analytics poll fetch failed");
                }
            }
        }
    });
    (receiver, AnalyticsPollHandle { task })
}

/// Day-bucketed aggregation over a trailing window ending at `now`.
pub fn aggregate_analytics(
    records: &[ConversationRecord],
    window_days: u32,
    now: DateTime<Utc>,
) -> CallAnalytics {
    let total = records.len() as u32;
    let successful = records.iter().filter(|r| r.successful).count() as u32;
    let failed = total - successful;

    let average_duration_seconds = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| f64::from(r.duration_seconds)).sum::<f64>() / f64::from(total)
    };

    let ratings: Vec<f64> = records.iter().filter_map(|r| r.rating).collect();
    let average_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    let window_days = window_days.max(1);
    let today = now.date_naive();
    let mut daily: Vec<DayBucket> = (0..window_days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(u64::from(offset))))
        .map(|date| DayBucket { date, total: 0 })
        .collect();
    for record in records {
        let date = record.started_at.date_naive();
        if let Some(bucket) = daily.iter_mut().find(|b| b.date == date) {
            bucket.total += 1;
        }
    }

    CallAnalytics { total, successful, failed, average_duration_seconds, average_rating, daily }
}
