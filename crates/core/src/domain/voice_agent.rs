use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::business::BusinessId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceAgentId(pub String);

impl VoiceAgentId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Identifier assigned by the remote agent provider on creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

/// A callable action the remote agent may invoke mid-conversation, backed by
/// a caller-supplied webhook URL. Only ids the compiler recognizes produce a
/// tool schema; others ride along untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTool {
    pub id: String,
    pub url: String,
    pub enabled: bool,
}

/// Remote linkage lifecycle for a local VoiceAgent row.
///
/// A row may sit in `Unlinked` only transiently, between local persistence
/// and successful remote creation. Re-entering `Creating` while already
/// `Creating` or `Linked` is rejected so a second tab cannot double-create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Unlinked,
    Creating,
    Linked,
    Updating,
}

impl LinkState {
    pub fn can_transition_to(&self, next: LinkState) -> bool {
        matches!(
            (self, next),
            (LinkState::Unlinked, LinkState::Creating)
                | (LinkState::Creating, LinkState::Linked)
                | (LinkState::Creating, LinkState::Unlinked)
                | (LinkState::Linked, LinkState::Updating)
                | (LinkState::Updating, LinkState::Linked)
                | (LinkState::Linked, LinkState::Unlinked)
        )
    }

    pub fn transition_to(&mut self, next: LinkState) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            *self = next;
            return Ok(());
        }
        Err(DomainError::InvalidLinkTransition { from: *self, to: next })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoiceAgent {
    pub id: VoiceAgentId,
    pub business_id: BusinessId,
    /// None until the first successful remote creation.
    pub agent_id: Option<AgentId>,
    pub name: String,
    pub personality: String,
    /// User-authored prompt. When non-empty it wins over the compiled one.
    pub system_prompt: String,
    pub first_message: String,
    pub provider_api_key: String,
    pub generator_api_key: String,
    pub booking_link: String,
    pub tools: Vec<WebhookTool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VoiceAgent {
    pub fn new(business_id: BusinessId, business_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: VoiceAgentId::generate(),
            business_id,
            agent_id: None,
            name: format!("{business_name} Assistant"),
            personality: "friendly and professional".to_string(),
            system_prompt: String::new(),
            first_message: String::new(),
            provider_api_key: String::new(),
            generator_api_key: String::new(),
            booking_link: String::new(),
            tools: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn link_state(&self) -> LinkState {
        if self.agent_id.is_some() {
            LinkState::Linked
        } else {
            LinkState::Unlinked
        }
    }
}
