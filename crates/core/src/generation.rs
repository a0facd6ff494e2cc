//! Request builder and response normalization for the external copy
//! generator.
//!
//! The generator itself is an opaque request/response collaborator; this
//! module owns the boundary: the structured request we send, the structured
//! response we accept, and the defaulting that guarantees a fully-formed
//! result even when the generator omits fields.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::business::{
    Branding, Business, FaqEntry, Industry, KnowledgeEntry, ServiceOffering, Testimonial,
    VocabularyTerms,
};
use crate::domain::voice_agent::VoiceAgent;
use crate::errors::ApplicationError;

/// What the owner typed in before generation: the identity seed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub name: String,
    pub industry: Industry,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub staff_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub business_name: String,
    pub industry: String,
    pub city: String,
    pub specialty: String,
    pub staff_name: String,
}

impl GenerationRequest {
    pub fn from_info(info: &BusinessInfo) -> Self {
        Self {
            business_name: info.name.trim().to_string(),
            industry: info.industry.as_str().to_string(),
            city: info.city.trim().to_string(),
            specialty: info.specialty.trim().to_string(),
            staff_name: info.staff_name.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAgentPersona {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub first_message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTerms {
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub appointment: String,
    #[serde(default)]
    pub service: String,
}

/// Raw generator response. Every field is optional on the wire; `normalize`
/// is the only path from here into the domain model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub services: Vec<ServiceOffering>,
    #[serde(default)]
    pub faqs: Vec<FaqEntry>,
    #[serde(default)]
    pub branding: Option<Branding>,
    #[serde(default)]
    pub voice_agent: GeneratedAgentPersona,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub terms: GeneratedTerms,
    #[serde(default)]
    pub knowledge_base: Vec<KnowledgeEntry>,
}

impl GeneratedContent {
    /// Replaces every missing or empty field with its documented default so
    /// a partially-formed response never propagates into the domain model.
    pub fn normalize(mut self, business_name: &str, industry: Industry) -> Self {
        let defaults = industry.default_terms();
        if self.tagline.trim().is_empty() {
            self.tagline = format!("Welcome to {business_name}");
        }
        if self.description.trim().is_empty() {
            self.description =
                format!("{business_name} proudly serves the local community.");
        }
        if self.branding.is_none() {
            self.branding = Some(Branding::default());
        }
        if self.voice_agent.name.trim().is_empty() {
            self.voice_agent.name = format!("{business_name} Assistant");
        }
        if self.voice_agent.personality.trim().is_empty() {
            self.voice_agent.personality = "friendly and professional".to_string();
        }
        if self.voice_agent.first_message.trim().is_empty() {
            self.voice_agent.first_message = format!(
                "Thank you for calling {business_name}. How can I help you today?"
            );
        }
        if self.terms.customer.trim().is_empty() {
            self.terms.customer = defaults.customer;
        }
        if self.terms.appointment.trim().is_empty() {
            self.terms.appointment = defaults.appointment;
        }
        if self.terms.service.trim().is_empty() {
            self.terms.service = defaults.service;
        }
        self.services.retain(|service| !service.name.trim().is_empty());
        self.faqs.retain(|faq| !faq.question.trim().is_empty());
        self.knowledge_base.retain(|entry| !entry.title.trim().is_empty());
        self
    }

    /// Copies normalized content onto the persisted rows. Callers must have
    /// run `normalize` first; empty fields here would otherwise overwrite
    /// defaults with nothing.
    pub fn apply_to(&self, business: &mut Business, agent: &mut VoiceAgent) {
        business.tagline = self.tagline.clone();
        business.description = self.description.clone();
        if let Some(branding) = &self.branding {
            business.branding = branding.clone();
        }
        business.terms = VocabularyTerms {
            customer: self.terms.customer.clone(),
            appointment: self.terms.appointment.clone(),
            service: self.terms.service.clone(),
        };
        business.services = self.services.clone();
        business.faqs = self.faqs.clone();
        business.testimonials = self.testimonials.clone();
        business.knowledge = self.knowledge_base.clone();

        agent.name = self.voice_agent.name.clone();
        agent.personality = self.voice_agent.personality.clone();
        agent.system_prompt = self.voice_agent.system_prompt.clone();
        agent.first_message = self.voice_agent.first_message.clone();
    }
}

/// Boundary trait for the external copy-generation service. The production
/// implementation lives with the HTTP clients; tests inject canned content.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, ApplicationError>;
}
