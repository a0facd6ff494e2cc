use std::sync::Arc;

use frontdesk_core::config::{AppConfig, LoadOptions};
use frontdesk_core::domain::business::BusinessId;
use frontdesk_core::embed::embed_snippet;
use frontdesk_db::repositories::{
    SqlBusinessRepository, SqlPreferenceRepository, SqlVoiceAgentRepository,
};
use frontdesk_provider::AgentProviderClient;
use frontdesk_state::{provision_agent, LocalCache, Repositories};

use crate::commands::CommandResult;

const COMMAND: &str = "provision";

pub fn run(business_id: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let business_id = BusinessId(business_id.to_string());
    let result = runtime.block_on(async {
        let pool = frontdesk_db::connect(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let repos = Repositories {
            businesses: Arc::new(SqlBusinessRepository::new(pool.clone())),
            agents: Arc::new(SqlVoiceAgentRepository::new(pool.clone())),
            preferences: Arc::new(SqlPreferenceRepository::new(pool.clone())),
        };

        let business = repos
            .businesses
            .find_by_id(&business_id)
            .await
            .map_err(|error| ("store_read", error.to_string(), 4u8))?
            .ok_or_else(|| {
                ("not_found", format!("business `{}` not found", business_id.0), 5u8)
            })?;
        let mut agent = repos
            .agents
            .find_by_business(&business.id)
            .await
            .map_err(|error| ("store_read", error.to_string(), 4u8))?
            .ok_or_else(|| {
                ("not_found", format!("no voice agent for business `{}`", business_id.0), 5u8)
            })?;

        let provider = AgentProviderClient::new(config.provider.base_url.clone());
        let outcome = provision_agent(&repos, &provider, &business, &mut agent)
            .await
            .map_err(|error| ("provisioning", error.to_string(), 6u8))?;

        // mirror the fresh projection for public rendering
        let merged = frontdesk_core::domain::business_config::BusinessConfig::derive(
            &business,
            Some(&agent),
        );
        let cache = LocalCache::new(config.cache.path.clone());
        if let Err(error) =
            cache.sync(&merged, &agent.provider_api_key, &agent.generator_api_key)
        {
            return Err(("cache_sync", error.to_string(), 7u8));
        }

        pool.close().await;
        Ok::<_, (&'static str, String, u8)>(outcome)
    });

    match result {
        Ok(outcome) => {
            let attach_note = if outcome.knowledge_attached {
                "knowledge base attached"
            } else {
                "knowledge base attach failed (agent still usable)"
            };
            CommandResult::success(
                COMMAND,
                format!(
                    "agent `{}` provisioned; {attach_note}; embed snippet:\n{}",
                    outcome.agent_id.0,
                    embed_snippet(&outcome.agent_id)
                ),
            )
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure(COMMAND, error_class, message, exit_code)
        }
    }
}
