use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::business::{BusinessId, UserId};

/// Per-user pointer to the currently active business. Upserted every time a
/// user switches; read on session start to restore the last-used business.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    pub user_id: UserId,
    pub active_business_id: BusinessId,
    pub updated_at: DateTime<Utc>,
}

impl UserPreference {
    pub fn new(user_id: UserId, active_business_id: BusinessId) -> Self {
        Self { user_id, active_business_id, updated_at: Utc::now() }
    }
}
