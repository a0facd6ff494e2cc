use serde::{Deserialize, Serialize};

use crate::domain::business::{
    Address, Branding, Business, BusinessId, FaqEntry, Industry, KnowledgeEntry,
    ServiceOffering, StaffMember, Testimonial, VocabularyTerms, WeeklyHours,
};
use crate::domain::voice_agent::{AgentId, VoiceAgent};

/// Flattened read-model of a Business plus its VoiceAgent, consumed by the
/// compiler, the provisioning flow, and the public renderer.
///
/// Never persisted on its own: it is rebuilt from the source rows on every
/// read, so two derivations from the same rows are guaranteed equal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessConfig {
    pub business_id: BusinessId,
    pub slug: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub industry: Industry,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: Address,
    pub hours: WeeklyHours,
    pub staff: StaffMember,
    pub branding: Branding,
    pub terms: VocabularyTerms,
    pub services: Vec<ServiceOffering>,
    pub faqs: Vec<FaqEntry>,
    pub testimonials: Vec<Testimonial>,
    pub knowledge: Vec<KnowledgeEntry>,
    pub agent_id: Option<AgentId>,
    pub agent_name: String,
    pub personality: String,
    pub system_prompt: String,
    pub first_message: String,
    pub booking_link: String,
}

impl BusinessConfig {
    /// Pure merge. An absent agent yields defaulted agent fields so the
    /// compiler never has to branch on a missing record.
    pub fn derive(business: &Business, agent: Option<&VoiceAgent>) -> Self {
        let (agent_id, agent_name, personality, system_prompt, first_message, booking_link) =
            match agent {
                Some(agent) => (
                    agent.agent_id.clone(),
                    agent.name.clone(),
                    agent.personality.clone(),
                    agent.system_prompt.clone(),
                    agent.first_message.clone(),
                    agent.booking_link.clone(),
                ),
                None => (
                    None,
                    format!("{} Assistant", business.name),
                    "friendly and professional".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                ),
            };

        Self {
            business_id: business.id.clone(),
            slug: business.slug.clone(),
            name: business.name.clone(),
            tagline: business.tagline.clone(),
            description: business.description.clone(),
            industry: business.industry,
            phone: business.phone.clone(),
            email: business.email.clone(),
            website: business.website.clone(),
            address: business.address.clone(),
            hours: business.hours.clone(),
            staff: business.staff.clone(),
            branding: business.branding.clone(),
            terms: business.terms.clone(),
            services: business.services.clone(),
            faqs: business.faqs.clone(),
            testimonials: business.testimonials.clone(),
            knowledge: business.knowledge.clone(),
            agent_id,
            agent_name,
            personality,
            system_prompt,
            first_message,
            booking_link,
        }
    }

    /// Greeting used when the agent has no explicit first message.
    pub fn effective_first_message(&self) -> String {
        if self.first_message.is_empty() {
            format!("Thank you for calling {}. How can I help you today?", self.name)
        } else {
            self.first_message.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::business::{Business, Industry, UserId};
    use crate::domain::voice_agent::{AgentId, VoiceAgent};

    use super::BusinessConfig;

    fn business() -> Business {
        let mut business =
            Business::new(UserId("u-1".to_string()), "Acme Dental", Industry::Dental);
        business.tagline = "Gentle care, bright smiles".to_string();
        business
    }

    #[test]
    fn derivations_from_same_rows_are_equal() {
        let business = business();
        let mut agent = VoiceAgent::new(business.id.clone(), &business.name);
        agent.agent_id = Some(AgentId("agent-1".to_string()));

        let first = BusinessConfig::derive(&business, Some(&agent));
        let second = BusinessConfig::derive(&business, Some(&agent));
        assert_eq!(first, second);
    }

    #[test]
    fn missing_agent_defaults_agent_fields() {
        let business = business();
        let config = BusinessConfig::derive(&business, None);
        assert_eq!(config.agent_name, "Acme Dental Assistant");
        assert!(config.agent_id.is_none());
        assert!(config.system_prompt.is_empty());
    }

    #[test]
    fn effective_first_message_falls_back_to_greeting() {
        let business = business();
        let config = BusinessConfig::derive(&business, None);
        assert_eq!(
            config.effective_first_message(),
            "Thank you for calling Acme Dental. How can I help you today?"
        );
    }
}
