use async_trait::async_trait;
use thiserror::Error;

use frontdesk_core::domain::business::{Business, BusinessId, UserId};
use frontdesk_core::domain::preference::UserPreference;
use frontdesk_core::domain::voice_agent::{AgentId, VoiceAgent, VoiceAgentId};

pub mod business;
pub mod memory;
pub mod preference;
pub mod public;
pub mod voice_agent;

pub use business::SqlBusinessRepository;
pub use memory::{
    InMemoryBusinessRepository, InMemoryPreferenceRepository, InMemoryVoiceAgentRepository,
};
pub use preference::SqlPreferenceRepository;
pub use voice_agent::SqlVoiceAgentRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("slug `{0}` could not be made unique")]
    SlugExhausted(String),
}

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn find_by_id(&self, id: &BusinessId) -> Result<Option<Business>, RepositoryError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, RepositoryError>;
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Business>, RepositoryError>;
    /// Inserts a new row, resolving slug collisions with a numeric suffix.
    /// Returns the business as persisted (its slug may differ from input).
    async fn create(&self, business: Business) -> Result<Business, RepositoryError>;
    /// Updates an existing row. The slug column is never touched: slugs are
    /// immutable once a public URL may have been shared.
    async fn update(&self, business: &Business) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &BusinessId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait VoiceAgentRepository: Send + Sync {
    async fn find_by_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Option<VoiceAgent>, RepositoryError>;
    async fn save(&self, agent: &VoiceAgent) -> Result<(), RepositoryError>;
    async fn set_remote_agent_id(
        &self,
        id: &VoiceAgentId,
        agent_id: &AgentId,
    ) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &VoiceAgentId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserPreference>, RepositoryError>;
    async fn set(&self, preference: &UserPreference) -> Result<(), RepositoryError>;
    async fn clear(&self, user_id: &UserId) -> Result<(), RepositoryError>;
}
