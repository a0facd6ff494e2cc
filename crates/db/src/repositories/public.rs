//! Anonymous read path keyed by slug, used by the public landing and call
//! pages before any session exists.
//!
//! This is a least-privilege boundary: the projection below is the complete
//! set of fields exposed without authentication. Owner identity, contact
//! email, API credentials, and webhook tool wiring are deliberately absent;
//! adding a field here widens the anonymous surface.

use serde::Serialize;
use sqlx::Row;

use frontdesk_core::domain::business::{
    Address, Branding, FaqEntry, ServiceOffering, Testimonial, WeeklyHours,
};
use frontdesk_core::domain::voice_agent::AgentId;

use super::business::row_to_business;
use super::RepositoryError;
use crate::DbPool;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublicBusinessData {
    pub slug: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub phone: String,
    pub address: Address,
    pub hours: WeeklyHours,
    pub branding: Branding,
    pub services: Vec<ServiceOffering>,
    pub faqs: Vec<FaqEntry>,
    pub testimonials: Vec<Testimonial>,
    pub agent_id: Option<AgentId>,
    pub agent_name: String,
    pub first_message: String,
}

/// Unknown slug is `Ok(None)`, never an error: the public page renders a
/// not-found state from it.
pub async fn get_public_business_data(
    pool: &DbPool,
    slug: &str,
) -> Result<Option<PublicBusinessData>, RepositoryError> {
    let row = sqlx::query(
        "SELECT b.id, b.owner_user_id, b.slug, b.name, b.tagline, b.description,
                b.industry, b.phone, b.email, b.website, b.address, b.hours, b.staff,
                b.branding, b.terms, b.services, b.faqs, b.testimonials, b.knowledge,
                b.created_at, b.updated_at,
                a.agent_id AS remote_agent_id, a.name AS agent_name,
                a.first_message AS agent_first_message
         FROM business b
         LEFT JOIN voice_agent a ON a.business_id = b.id
         WHERE b.slug = ?",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else { return Ok(None) };
    let business = row_to_business(&row)?;

    let remote_agent_id: Option<String> = row
        .try_get("remote_agent_id")
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let agent_name: Option<String> =
        row.try_get("agent_name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let first_message: Option<String> = row
        .try_get("agent_first_message")
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Some(PublicBusinessData {
        slug: business.slug,
        name: business.name,
        tagline: business.tagline,
        description: business.description,
        phone: business.phone,
        address: business.address,
        hours: business.hours,
        branding: business.branding,
        services: business.services,
        faqs: business.faqs,
        testimonials: business.testimonials,
        agent_id: remote_agent_id.filter(|id| !id.is_empty()).map(AgentId),
        agent_name: agent_name.unwrap_or_default(),
        first_message: first_message.unwrap_or_default(),
    }))
}
