//! Frontdesk core - domain model and deterministic compilation
//!
//! This crate holds everything that must not perform I/O:
//! - The domain model: a `Business`, its `VoiceAgent`, and the derived
//!   `BusinessConfig` read-model consumed by rendering and provisioning.
//! - The prompt/tool compiler: pure functions that turn a `BusinessConfig`
//!   into the system prompt, the knowledge-base document, and the callable
//!   tool schemas pushed to the remote agent provider.
//! - The generation request builder: the structured request sent to the
//!   external copy generator and the normalization of its response.
//!
//! # Determinism principle
//!
//! Compilation is strictly text concatenation over the input config. Two
//! calls with identical input produce byte-identical output; nothing in this
//! crate reads the clock, the network, or a random source on the compile
//! path. That property is what makes `update_agent` idempotent upstream.

pub mod compiler;
pub mod config;
pub mod domain;
pub mod embed;
pub mod errors;
pub mod generation;

pub use compiler::{
    compile_knowledge_base, compile_system_prompt, compile_tools, select_voice, ToolSchema,
    VoiceId,
};
pub use domain::business::{
    Address, Branding, Business, BusinessId, FaqEntry, Industry, KnowledgeEntry,
    ServiceOffering, StaffMember, Testimonial, UserId, VocabularyTerms, WeeklyHours,
};
pub use domain::business_config::BusinessConfig;
pub use domain::preference::UserPreference;
pub use domain::voice_agent::{AgentId, LinkState, VoiceAgent, VoiceAgentId, WebhookTool};
pub use errors::{ApplicationError, DomainError};
pub use generation::{BusinessInfo, CopyGenerator, GeneratedContent, GenerationRequest};
