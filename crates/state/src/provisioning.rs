//! The business-to-agent provisioning flow: persist rows, compile artifacts,
//! create or update the remote agent, then best-effort knowledge attachment.

use tracing::{info, warn};

use frontdesk_core::compiler::compile_tools;
use frontdesk_core::domain::business::{Business, UserId};
use frontdesk_core::domain::business_config::BusinessConfig;
use frontdesk_core::domain::voice_agent::{AgentId, VoiceAgent};
use frontdesk_core::errors::ApplicationError;
use frontdesk_core::generation::{BusinessInfo, CopyGenerator, GenerationRequest};
use frontdesk_provider::{ProviderError, VoiceAgentProvider};

use crate::Repositories;

fn persistence(error: frontdesk_db::repositories::RepositoryError) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}

fn provider_error(error: ProviderError) -> ApplicationError {
    if error.is_credential() {
        ApplicationError::Credential(error.to_string())
    } else {
        ApplicationError::Provider(error.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct ProvisioningOutcome {
    pub agent_id: AgentId,
    /// False when the knowledge-base upload failed; the agent is still
    /// usable, so the flow reports rather than fails.
    pub knowledge_attached: bool,
}

#[derive(Clone, Debug)]
pub struct CreateBusinessRequest {
    pub info: BusinessInfo,
    pub provider_api_key: String,
    pub generator_api_key: String,
}

/// Creates (or refreshes) the remote agent for locally persisted rows.
///
/// Create runs at most once per VoiceAgent: when a remote id already exists
/// the flow goes through update instead, so a retry after a partial failure
/// never double-creates.
pub async fn provision_agent(
    repos: &Repositories,
    provider: &dyn VoiceAgentProvider,
    business: &Business,
    agent: &mut VoiceAgent,
) -> Result<ProvisioningOutcome, ApplicationError> {
    if agent.provider_api_key.trim().is_empty() {
        return Err(ApplicationError::Credential(
            "no agent-provider API key configured".to_string(),
        ));
    }

    let config = BusinessConfig::derive(business, Some(agent));
    let tools = compile_tools(&agent.tools, &config);

    let agent_id = match &agent.agent_id {
        Some(existing) => {
            provider
                .update_agent(&agent.provider_api_key, existing, &config)
                .await
                .map_err(provider_error)?;
            existing.clone()
        }
        None => {
            let created = provider
                .create_agent(&agent.provider_api_key, &config, &tools)
                .await
                .map_err(provider_error)?;
            repos
                .agents
                .set_remote_agent_id(&agent.id, &created)
                .await
                .map_err(persistence)?;
            agent.agent_id = Some(created.clone());
            info!(
                business_id = %business.id.0,
                agent_id = %created.0,
                "remote agent provisioned"
            );
            created
        }
    };

    let knowledge_attached = match provider
        .attach_knowledge_base(&agent.provider_api_key, &agent_id, &config)
        .await
    {
        Ok(()) => true,
        Err(error) => {
            // agent usability does not depend on the knowledge base
            warn!(
                agent_id = %agent_id.0,
                error = %error,
                "knowledge-base attach failed, continuing without it"
            );
            false
        }
    };

    Ok(ProvisioningOutcome { agent_id, knowledge_attached })
}

/// End-to-end onboarding: generate content (when a generator is supplied),
/// persist Business + VoiceAgent as a unit, and provision the remote agent.
///
/// Callers re-sync the local cache with the returned config afterwards.
pub async fn create_business_with_agent(
    repos: &Repositories,
    provider: &dyn VoiceAgentProvider,
    generator: Option<&dyn CopyGenerator>,
    user_id: &UserId,
    request: CreateBusinessRequest,
) -> Result<(Business, VoiceAgent, ProvisioningOutcome), ApplicationError> {
    if request.info.name.trim().is_empty() {
        return Err(ApplicationError::Validation(
            "business name is required".to_string(),
        ));
    }

    let mut business =
        Business::new(user_id.clone(), request.info.name.clone(), request.info.industry);
    business.staff.name = request.info.staff_name.clone();
    let mut agent = VoiceAgent::new(business.id.clone(), &business.name);
    agent.provider_api_key = request.provider_api_key;
    agent.generator_api_key = request.generator_api_key;

    if let Some(generator) = generator {
        let generated = generator
            .generate(&GenerationRequest::from_info(&request.info))
            .await?
            .normalize(&business.name, business.industry);
        generated.apply_to(&mut business, &mut agent);
    }

    let business = repos.businesses.create(business).await.map_err(persistence)?;
    agent.business_id = business.id.clone();
    repos.agents.save(&agent).await.map_err(persistence)?;

    let outcome = provision_agent(repos, provider, &business, &mut agent).await?;
    Ok((business, agent, outcome))
}
