use std::sync::Arc;

use tracing::{info, warn};

use frontdesk_core::domain::business::{
    Address, Branding, Business, BusinessId, FaqEntry, Industry, KnowledgeEntry,
    ServiceOffering, StaffMember, Testimonial, UserId, VocabularyTerms, WeeklyHours,
};
use frontdesk_core::domain::business_config::BusinessConfig;
use frontdesk_core::domain::preference::UserPreference;
use frontdesk_core::domain::voice_agent::{VoiceAgent, WebhookTool};
use frontdesk_core::errors::{ApplicationError, DomainError};
use frontdesk_db::repositories::RepositoryError;
use frontdesk_provider::VoiceAgentProvider;

use crate::Repositories;

fn persistence(error: RepositoryError) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}

/// Partial update to the active business. `None` fields are left untouched;
/// slug and ownership are not patchable at all.
#[derive(Clone, Debug, Default)]
pub struct BusinessPatch {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub industry: Option<Industry>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<Address>,
    pub hours: Option<WeeklyHours>,
    pub staff: Option<StaffMember>,
    pub branding: Option<Branding>,
    pub terms: Option<VocabularyTerms>,
    pub services: Option<Vec<ServiceOffering>>,
    pub faqs: Option<Vec<FaqEntry>>,
    pub testimonials: Option<Vec<Testimonial>>,
    pub knowledge: Option<Vec<KnowledgeEntry>>,
}

impl BusinessPatch {
    fn apply(&self, business: &mut Business) {
        macro_rules! patch {
            ($field:ident) => {
                if let Some(value) = &self.$field {
                    business.$field = value.clone();
                }
            };
        }
        patch!(name);
        patch!(tagline);
        patch!(description);
        patch!(phone);
        patch!(email);
        patch!(website);
        patch!(address);
        patch!(hours);
        patch!(staff);
        patch!(branding);
        patch!(terms);
        patch!(services);
        patch!(faqs);
        patch!(testimonials);
        patch!(knowledge);
        if let Some(industry) = self.industry {
            business.industry = industry;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VoiceAgentPatch {
    pub name: Option<String>,
    pub personality: Option<String>,
    pub system_prompt: Option<String>,
    pub first_message: Option<String>,
    pub booking_link: Option<String>,
    pub provider_api_key: Option<String>,
    pub generator_api_key: Option<String>,
    pub tools: Option<Vec<WebhookTool>>,
}

impl VoiceAgentPatch {
    fn apply(&self, agent: &mut VoiceAgent) {
        macro_rules! patch {
            ($field:ident) => {
                if let Some(value) = &self.$field {
                    agent.$field = value.clone();
                }
            };
        }
        patch!(name);
        patch!(personality);
        patch!(system_prompt);
        patch!(first_message);
        patch!(booking_link);
        patch!(provider_api_key);
        patch!(generator_api_key);
        patch!(tools);
    }
}

/// Per-session orchestrator over the canonical store.
///
/// Operations never propagate errors to the caller; each one captures its
/// failure into `last_error` and returns whether it succeeded. Callers
/// render `last_error`, they do not catch.
pub struct ConfigStore {
    repos: Repositories,
    provider: Option<Arc<dyn VoiceAgentProvider>>,
    businesses: Vec<Business>,
    active_business: Option<Business>,
    active_agent: Option<VoiceAgent>,
    loading: bool,
    last_error: Option<String>,
}

impl ConfigStore {
    pub fn new(repos: Repositories, provider: Option<Arc<dyn VoiceAgentProvider>>) -> Self {
        Self {
            repos,
            provider,
            businesses: Vec::new(),
            active_business: None,
            active_agent: None,
            loading: false,
            last_error: None,
        }
    }

    pub fn businesses(&self) -> &[Business] {
        &self.businesses
    }

    pub fn active_business(&self) -> Option<&Business> {
        self.active_business.as_ref()
    }

    pub fn active_agent(&self) -> Option<&VoiceAgent> {
        self.active_agent.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Pure derivation of the merged read-model; no I/O.
    pub fn active_business_config(&self) -> Option<BusinessConfig> {
        self.active_business
            .as_ref()
            .map(|business| BusinessConfig::derive(business, self.active_agent.as_ref()))
    }

    fn capture<T>(&mut self, result: Result<T, ApplicationError>) -> bool {
        self.loading = false;
        match result {
            Ok(_) => {
                self.last_error = None;
                true
            }
            Err(error) => {
                self.last_error = Some(error.to_string());
                false
            }
        }
    }

    /// Replaces the business list with the store's current set. Leaves the
    /// active selection alone.
    pub async fn load_businesses(&mut self, user_id: &UserId) -> bool {
        self.loading = true;
        let result = self
            .repos
            .businesses
            .list_for_user(user_id)
            .await
            .map_err(persistence)
            .map(|listed| self.businesses = listed);
        self.capture(result)
    }

    /// Restores the last-used business from the preference row, falling back
    /// to the first listed business (and persisting that choice) when no
    /// preference exists or it points at a business that no longer exists.
    pub async fn load_active_business(&mut self, user_id: &UserId) -> bool {
        self.loading = true;
        let result = self.try_load_active(user_id).await;
        self.capture(result)
    }

    async fn try_load_active(&mut self, user_id: &UserId) -> Result<(), ApplicationError> {
        let preference =
            self.repos.preferences.get(user_id).await.map_err(persistence)?;

        if let Some(preference) = preference {
            match self
                .repos
                .businesses
                .find_by_id(&preference.active_business_id)
                .await
                .map_err(persistence)?
            {
                Some(business) => {
                    return self.activate(business).await;
                }
                None => {
                    // stale pointer: the business was deleted elsewhere
                    warn!(
                        business_id = %preference.active_business_id.0,
                        "active-business preference is stale, re-selecting"
                    );
                    self.repos.preferences.clear(user_id).await.map_err(persistence)?;
                }
            }
        }

        let Some(first) = self.businesses.first().cloned() else {
            self.active_business = None;
            self.active_agent = None;
            return Ok(());
        };
        self.repos
            .preferences
            .set(&UserPreference::new(user_id.clone(), first.id.clone()))
            .await
            .map_err(persistence)?;
        self.activate(first).await
    }

    async fn activate(&mut self, business: Business) -> Result<(), ApplicationError> {
        let agent = self
            .repos
            .agents
            .find_by_business(&business.id)
            .await
            .map_err(persistence)?;
        self.active_business = Some(business);
        self.active_agent = agent;
        Ok(())
    }

    /// Switches the active business after verifying ownership. On an
    /// authorization failure nothing in memory changes.
    ///
    /// The local cache is not touched here; callers that mutate the active
    /// selection re-sync the cache explicitly afterwards.
    pub async fn set_active_business(
        &mut self,
        user_id: &UserId,
        business_id: &BusinessId,
    ) -> bool {
        self.loading = true;
        let result = self.try_set_active(user_id, business_id).await;
        self.capture(result)
    }

    async fn try_set_active(
        &mut self,
        user_id: &UserId,
        business_id: &BusinessId,
    ) -> Result<(), ApplicationError> {
        let business = self
            .repos
            .businesses
            .find_by_id(business_id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| {
                ApplicationError::Validation(format!("business `{}` not found", business_id.0))
            })?;

        if &business.owner_user_id != user_id {
            return Err(DomainError::NotOwner {
                business_id: business_id.0.clone(),
                user_id: user_id.0.clone(),
            }
            .into());
        }

        self.repos
            .preferences
            .set(&UserPreference::new(user_id.clone(), business_id.clone()))
            .await
            .map_err(persistence)?;
        self.activate(business).await
    }

    /// Applies a partial update, then re-fetches the row so the in-memory
    /// copy reflects exactly what the store persisted.
    pub async fn update_current_business(&mut self, patch: BusinessPatch) -> bool {
        self.loading = true;
        let result = self.try_update_business(patch).await;
        self.capture(result)
    }

    async fn try_update_business(
        &mut self,
        patch: BusinessPatch,
    ) -> Result<(), ApplicationError> {
        let Some(mut business) = self.active_business.clone() else {
            return Err(ApplicationError::Validation("no active business".to_string()));
        };
        patch.apply(&mut business);
        self.repos.businesses.update(&business).await.map_err(persistence)?;

        let refreshed = self
            .repos
            .businesses
            .find_by_id(&business.id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| {
                ApplicationError::Persistence("business vanished during update".to_string())
            })?;
        if let Some(slot) = self.businesses.iter_mut().find(|b| b.id == refreshed.id) {
            *slot = refreshed.clone();
        }
        self.active_business = Some(refreshed);
        Ok(())
    }

    pub async fn update_current_voice_agent(&mut self, patch: VoiceAgentPatch) -> bool {
        self.loading = true;
        let result = self.try_update_agent(patch).await;
        self.capture(result)
    }

    async fn try_update_agent(
        &mut self,
        patch: VoiceAgentPatch,
    ) -> Result<(), ApplicationError> {
        let Some(mut agent) = self.active_agent.clone() else {
            return Err(ApplicationError::Validation("no active voice agent".to_string()));
        };
        patch.apply(&mut agent);
        self.repos.agents.save(&agent).await.map_err(persistence)?;

        let refreshed = self
            .repos
            .agents
            .find_by_business(&agent.business_id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| {
                ApplicationError::Persistence("voice agent vanished during update".to_string())
            })?;
        self.active_agent = Some(refreshed);
        Ok(())
    }

    /// Deletes the active business. The store cascades the VoiceAgent row;
    /// the remote agent resource is deleted best-effort. If other businesses
    /// remain the first becomes active.
    pub async fn delete_current_business(&mut self, user_id: &UserId) -> bool {
        self.loading = true;
        let result = self.try_delete_current(user_id).await;
        self.capture(result)
    }

    async fn try_delete_current(&mut self, user_id: &UserId) -> Result<(), ApplicationError> {
        let Some(business) = self.active_business.clone() else {
            return Err(ApplicationError::Validation("no active business".to_string()));
        };

        if let (Some(provider), Some(agent)) = (&self.provider, &self.active_agent) {
            if let Some(agent_id) = &agent.agent_id {
                if let Err(error) =
                    provider.delete_agent(&agent.provider_api_key, agent_id).await
                {
                    warn!(agent_id = %agent_id.0, error = %error, "remote agent delete failed, continuing");
                }
            }
        }

        self.repos.businesses.delete(&business.id).await.map_err(persistence)?;
        self.repos.preferences.clear(user_id).await.map_err(persistence)?;
        info!(business_id = %business.id.0, "business deleted");

        self.businesses.retain(|b| b.id != business.id);
        self.active_business = None;
        self.active_agent = None;

        if let Some(next) = self.businesses.first().cloned() {
            self.repos
                .preferences
                .set(&UserPreference::new(user_id.clone(), next.id.clone()))
                .await
                .map_err(persistence)?;
            self.activate(next).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use frontdesk_core::compiler::ToolSchema;
    use frontdesk_core::domain::business::{Business, BusinessId, Industry, UserId};
    use frontdesk_core::domain::business_config::BusinessConfig;
    use frontdesk_core::domain::voice_agent::{AgentId, VoiceAgent};
    use frontdesk_db::repositories::{
        InMemoryBusinessRepository, InMemoryPreferenceRepository, InMemoryVoiceAgentRepository,
    };
    use frontdesk_provider::{ProviderError, VoiceAgentProvider};

    use crate::Repositories;

    use super::{BusinessPatch, ConfigStore};

    #[derive(Default)]
    struct CountingProvider {
        deletes: AtomicU32,
    }

    #[async_trait::async_trait]
    impl VoiceAgentProvider for CountingProvider {
        async fn create_agent(
            &self,
            _credential: &str,
            _config: &BusinessConfig,
            _tools: &[ToolSchema],
        ) -> Result<AgentId, ProviderError> {
            Ok(AgentId("mock-agent".to_string()))
        }

        async fn update_agent(
            &self,
            _credential: &str,
            _agent_id: &AgentId,
            _config: &BusinessConfig,
        ) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn attach_knowledge_base(
            &self,
            _credential: &str,
            _agent_id: &AgentId,
            _config: &BusinessConfig,
        ) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn delete_agent(
            &self,
            _credential: &str,
            _agent_id: &AgentId,
        ) -> Result<(), ProviderError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn repos() -> Repositories {
        Repositories {
            businesses: Arc::new(InMemoryBusinessRepository::new()),
            agents: Arc::new(InMemoryVoiceAgentRepository::new()),
            preferences: Arc::new(InMemoryPreferenceRepository::new()),
        }
    }

    async fn seed_business(repos: &Repositories, user: &str, name: &str) -> Business {
        let business = repos
            .businesses
            .create(Business::new(UserId(user.to_string()), name, Industry::Dental))
            .await
            .expect("create business");
        let mut agent = VoiceAgent::new(business.id.clone(), &business.name);
        agent.agent_id = Some(AgentId(format!("remote-{name}")));
        repos.agents.save(&agent).await.expect("save agent");
        business
    }

    #[tokio::test]
    async fn load_active_self_heals_to_first_business() {
        let repos = repos();
        let user = UserId("u-1".to_string());
        let business = seed_business(&repos, "u-1", "Acme Dental").await;

        let mut store = ConfigStore::new(repos.clone(), None);
        assert!(store.load_businesses(&user).await);
        assert!(store.load_active_business(&user).await);

        assert_eq!(store.active_business().map(|b| b.id.clone()), Some(business.id.clone()));
        // the self-healed choice is persisted
        let preference = repos.preferences.get(&user).await.expect("get").expect("persisted");
        assert_eq!(preference.active_business_id, business.id);
    }

    #[tokio::test]
    async fn set_active_rejects_foreign_business_without_mutating_state() {
        let repos = repos();
        let user_one = UserId("u-1".to_string());
        let mine = seed_business(&repos, "u-1", "Mine").await;
        let theirs = seed_business(&repos, "u-2", "Theirs").await;

        let mut store = ConfigStore::new(repos, None);
        store.load_businesses(&user_one).await;
        store.load_active_business(&user_one).await;
        assert_eq!(store.active_business().map(|b| b.id.clone()), Some(mine.id.clone()));

        let ok = store.set_active_business(&user_one, &theirs.id).await;
        assert!(!ok);
        assert!(store.last_error().expect("error captured").contains("does not belong"));
        assert_eq!(store.active_business().map(|b| b.id.clone()), Some(mine.id));
    }

    #[tokio::test]
    async fn update_reflects_what_the_store_persisted() {
        let repos = repos();
        let user = UserId("u-1".to_string());
        seed_business(&repos, "u-1", "Acme Dental").await;

        let mut store = ConfigStore::new(repos, None);
        store.load_businesses(&user).await;
        store.load_active_business(&user).await;

        let patch = BusinessPatch {
            tagline: Some("Gentle care".to_string()),
            ..BusinessPatch::default()
        };
        assert!(store.update_current_business(patch).await);
        assert_eq!(store.active_business().expect("active").tagline, "Gentle care");
        // the list copy is refreshed too
        assert_eq!(store.businesses()[0].tagline, "Gentle care");
    }

    #[tokio::test]
    async fn deleting_only_business_clears_selection() {
        let repos = repos();
        let user = UserId("u-1".to_string());
        seed_business(&repos, "u-1", "Acme Dental").await;

        let provider = Arc::new(CountingProvider::default());
        let mut store = ConfigStore::new(repos, Some(provider.clone()));
        store.load_businesses(&user).await;
        store.load_active_business(&user).await;

        assert!(store.delete_current_business(&user).await);
        assert!(store.businesses().is_empty());
        assert!(store.active_business().is_none());
        assert!(store.active_business_config().is_none());
        assert_eq!(provider.deletes.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn deleting_one_of_two_activates_the_remaining() {
        let repos = repos();
        let user = UserId("u-1".to_string());
        let first = seed_business(&repos, "u-1", "First").await;
        let second = seed_business(&repos, "u-1", "Second").await;

        let mut store = ConfigStore::new(repos, None);
        store.load_businesses(&user).await;
        store.load_active_business(&user).await;
        store.set_active_business(&user, &second.id).await;

        assert!(store.delete_current_business(&user).await);
        assert_eq!(store.businesses().len(), 1);
        assert_eq!(store.active_business().map(|b| b.id.clone()), Some(first.id));
    }

    #[tokio::test]
    async fn stale_preference_falls_back_and_reselects() {
        let repos = repos();
        let user = UserId("u-1".to_string());
        let kept = seed_business(&repos, "u-1", "Kept").await;
        let doomed = seed_business(&repos, "u-1", "Doomed").await;

        // preference points at a business deleted behind our back
        repos
            .preferences
            .set(&frontdesk_core::domain::preference::UserPreference::new(
                user.clone(),
                doomed.id.clone(),
            ))
            .await
            .expect("set pref");
        repos.businesses.delete(&doomed.id).await.expect("delete");

        let mut store = ConfigStore::new(repos, None);
        store.load_businesses(&user).await;
        assert!(store.load_active_business(&user).await);
        assert_eq!(store.active_business().map(|b| b.id.clone()), Some(kept.id));
    }

    #[tokio::test]
    async fn config_derivation_is_consistent_across_calls() {
        let repos = repos();
        let user = UserId("u-1".to_string());
        seed_business(&repos, "u-1", "Acme Dental").await;

        let mut store = ConfigStore::new(repos, None);
        store.load_businesses(&user).await;
        store.load_active_business(&user).await;

        let first = store.active_business_config().expect("config");
        let second = store.active_business_config().expect("config");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_business_surfaces_validation_error() {
        let repos = repos();
        let user = UserId("u-1".to_string());
        let mut store = ConfigStore::new(repos, None);

        let ok = store
            .set_active_business(&user, &BusinessId("ghost".to_string()))
            .await;
        assert!(!ok);
        assert!(store.last_error().expect("captured").contains("not found"));
    }
}
