//! In-memory repository doubles for orchestrator and flow tests.

use std::collections::HashMap;

use tokio::sync::RwLock;

use frontdesk_core::domain::business::{Business, BusinessId, UserId};
use frontdesk_core::domain::preference::UserPreference;
use frontdesk_core::domain::voice_agent::{AgentId, VoiceAgent, VoiceAgentId};

use super::{
    BusinessRepository, PreferenceRepository, RepositoryError, VoiceAgentRepository,
};

#[derive(Default)]
pub struct InMemoryBusinessRepository {
    rows: RwLock<HashMap<String, Business>>,
}

impl InMemoryBusinessRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BusinessRepository for InMemoryBusinessRepository {
    async fn find_by_id(&self, id: &BusinessId) -> Result<Option<Business>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id.0).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|b| b.slug == slug).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Business>, RepositoryError> {
        let rows = self.rows.read().await;
        let mut listed: Vec<Business> =
            rows.values().filter(|b| &b.owner_user_id == user_id).cloned().collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.0.cmp(&b.id.0)));
        Ok(listed)
    }

    async fn create(&self, mut business: Business) -> Result<Business, RepositoryError> {
        let mut rows = self.rows.write().await;
        let base_slug = business.slug.clone();
        let mut attempt = 1;
        while rows.values().any(|b| b.slug == business.slug) {
            attempt += 1;
            business.slug = format!("{base_slug}-{attempt}");
        }
        rows.insert(business.id.0.clone(), business.clone());
        Ok(business)
    }

    async fn update(&self, business: &Business) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows.get_mut(&business.id.0) {
            let slug = existing.slug.clone();
            *existing = business.clone();
            existing.slug = slug;
        }
        Ok(())
    }

    async fn delete(&self, id: &BusinessId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        rows.remove(&id.0);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryVoiceAgentRepository {
    rows: RwLock<HashMap<String, VoiceAgent>>,
}

impl InMemoryVoiceAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VoiceAgentRepository for InMemoryVoiceAgentRepository {
    async fn find_by_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Option<VoiceAgent>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|a| &a.business_id == business_id).cloned())
    }

    async fn save(&self, agent: &VoiceAgent) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        rows.insert(agent.id.0.clone(), agent.clone());
        Ok(())
    }

    async fn set_remote_agent_id(
        &self,
        id: &VoiceAgentId,
        agent_id: &AgentId,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        if let Some(agent) = rows.get_mut(&id.0) {
            agent.agent_id = Some(agent_id.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &VoiceAgentId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        rows.remove(&id.0);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPreferenceRepository {
    rows: RwLock<HashMap<String, UserPreference>>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceRepository for InMemoryPreferenceRepository {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserPreference>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&user_id.0).cloned())
    }

    async fn set(&self, preference: &UserPreference) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        rows.insert(preference.user_id.0.clone(), preference.clone());
        Ok(())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        rows.remove(&user_id.0);
        Ok(())
    }
}
