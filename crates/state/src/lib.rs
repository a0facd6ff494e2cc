//! Session-scoped configuration state.
//!
//! `ConfigStore` is the orchestrator between the canonical relational store
//! and everything that consumes a merged `BusinessConfig`. It is constructed
//! per session and torn down on logout; nothing here is a process-wide
//! singleton, so server-rendered deployments cannot leak state across
//! tenants.
//!
//! The local cache is a read-through projection for contexts where the
//! canonical store is not available (public pages, pre-authentication). It
//! is refreshed only by explicit `sync` calls from code that just mutated
//! canonical data; it is never written back to the store.

pub mod cache;
pub mod provisioning;
pub mod store;

use std::sync::Arc;

use frontdesk_db::repositories::{
    BusinessRepository, PreferenceRepository, VoiceAgentRepository,
};

pub use cache::{CachedState, LocalCache};
pub use provisioning::{
    create_business_with_agent, provision_agent, CreateBusinessRequest, ProvisioningOutcome,
};
pub use store::{BusinessPatch, ConfigStore, VoiceAgentPatch};

/// The three store-adapter handles every flow in this crate needs.
#[derive(Clone)]
pub struct Repositories {
    pub businesses: Arc<dyn BusinessRepository>,
    pub agents: Arc<dyn VoiceAgentRepository>,
    pub preferences: Arc<dyn PreferenceRepository>,
}
