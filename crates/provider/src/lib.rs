//! Client for the remote conversational-agent service.
//!
//! The provider hosts the actual voice agent; this crate owns the wire
//! protocol: agent create/update/get/delete, knowledge-base attachment,
//! credential validation, and paginated conversation listing with local
//! analytics aggregation.
//!
//! Failure policy mirrors the provisioning design: no automatic retry or
//! backoff anywhere in this crate. A failure surfaces once and is retried by
//! explicit user action, except credential validation (resolves to a bool)
//! and knowledge attachment (best-effort at the provisioning layer).

pub mod client;
pub mod conversations;
pub mod error;

use async_trait::async_trait;

use frontdesk_core::compiler::ToolSchema;
use frontdesk_core::domain::business_config::BusinessConfig;
use frontdesk_core::domain::voice_agent::AgentId;

pub use client::{AgentProviderClient, RemoteAgent};
pub use conversations::{
    aggregate_analytics, spawn_analytics_poll, AnalyticsPollHandle, CallAnalytics,
    ConversationRecord, DayBucket,
};
pub use error::ProviderError;

/// The subset of provider operations the provisioning flow depends on,
/// expressed as a trait so flows can run against a test double.
#[async_trait]
pub trait VoiceAgentProvider: Send + Sync {
    /// Creates a remote agent and returns its assigned id. Callers must
    /// check for an existing remote id first; create is not idempotent.
    async fn create_agent(
        &self,
        credential: &str,
        config: &BusinessConfig,
        tools: &[ToolSchema],
    ) -> Result<AgentId, ProviderError>;

    /// PATCH-style partial update: prompt and first message only. Tools and
    /// voice are create-only in the current protocol.
    async fn update_agent(
        &self,
        credential: &str,
        agent_id: &AgentId,
        config: &BusinessConfig,
    ) -> Result<(), ProviderError>;

    /// Uploads the compiled knowledge-base document. Callers treat failure
    /// as non-fatal.
    async fn attach_knowledge_base(
        &self,
        credential: &str,
        agent_id: &AgentId,
        config: &BusinessConfig,
    ) -> Result<(), ProviderError>;

    async fn delete_agent(
        &self,
        credential: &str,
        agent_id: &AgentId,
    ) -> Result<(), ProviderError>;
}
