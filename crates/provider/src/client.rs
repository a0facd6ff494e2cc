use reqwest::multipart;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use frontdesk_core::compiler::{
    compile_knowledge_base, compile_system_prompt, select_voice, ToolSchema,
};
use frontdesk_core::domain::business_config::BusinessConfig;
use frontdesk_core::domain::voice_agent::AgentId;

use crate::error::ProviderError;
use crate::VoiceAgentProvider;

/// Remote agent resource as the provider reports it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RemoteAgent {
    pub agent_id: String,
    pub name: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub first_message: String,
    #[serde(default)]
    pub voice: String,
}

#[derive(Debug, Deserialize)]
struct CreateAgentResponse {
    agent_id: String,
}

#[derive(Clone)]
pub struct AgentProviderClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
}

impl AgentProviderClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: Client::new(), base_url: trim_trailing_slash(base_url.into()) }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::from_status(status.as_u16(), body))
    }

    pub async fn get_agent(
        &self,
        credential: &str,
        agent_id: &AgentId,
    ) -> Result<RemoteAgent, ProviderError> {
        let response = self
            .http
            .get(self.url(&format!("/v1/agents/{}", agent_id.0)))
            .bearer_auth(credential)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response
            .json::<RemoteAgent>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }

    /// Resolves to a bool by catching every failure mode; a credential probe
    /// must never take down the flow that asked.
    pub async fn validate_credential(&self, credential: &str) -> bool {
        let response = self
            .http
            .get(self.url("/v1/me"))
            .bearer_auth(credential)
            .send()
            .await;
        match response {
            Ok(response) => response.status() == StatusCode::OK,
            Err(error) => {
                debug!(error = %error, "credential validation transport failure");
                false
            }
        }
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[async_trait::async_trait]
impl VoiceAgentProvider for AgentProviderClient {
    async fn create_agent(
        &self,
        credential: &str,
        config: &BusinessConfig,
        tools: &[ToolSchema],
    ) -> Result<AgentId, ProviderError> {
        let body = json!({
            "name": config.agent_name,
            "system_prompt": compile_system_prompt(config),
            "first_message": config.effective_first_message(),
            "voice": select_voice(&config.personality).0,
            "tools": tools,
        });

        let response = self
            .http
            .post(self.url("/v1/agents"))
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let created = response
            .json::<CreateAgentResponse>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        debug!(agent_id = %created.agent_id, business = %config.name, "remote agent created");
        Ok(AgentId(created.agent_id))
    }

    async fn update_agent(
        &self,
        credential: &str,
        agent_id: &AgentId,
        config: &BusinessConfig,
    ) -> Result<(), ProviderError> {
        // Prompt and greeting only; compile_system_prompt is deterministic,
        // so re-sending the same config is a no-op on the remote side.
        let body = json!({
            "system_prompt": compile_system_prompt(config),
            "first_message": config.effective_first_message(),
        });

        let response = self
            .http
            .patch(self.url(&format!("/v1/agents/{}", agent_id.0)))
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn attach_knowledge_base(
        &self,
        credential: &str,
        agent_id: &AgentId,
        config: &BusinessConfig,
    ) -> Result<(), ProviderError> {
        let document = compile_knowledge_base(config);
        let part = multipart::Part::text(document)
            .file_name(format!("{}-knowledge.txt", config.slug))
            .mime_str("text/plain")
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url(&format!("/v1/agents/{}/knowledge", agent_id.0)))
            .bearer_auth(credential)
            .multipart(form)
            .send()
            .await?;
        if let Err(error) = Self::check(response).await {
            warn!(agent_id = %agent_id.0, error = %error, "knowledge-base attach failed");
            return Err(error);
        }
        Ok(())
    }

    async fn delete_agent(
        &self,
        credential: &str,
        agent_id: &AgentId,
    ) -> Result<(), ProviderError> {
        let response = self
            .http
            .delete(self.url(&format!("/v1/agents/{}", agent_id.0)))
            .bearer_auth(credential)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use frontdesk_core::compiler::compile_tools;
    use frontdesk_core::domain::business::{Business, Industry, UserId};
    use frontdesk_core::domain::business_config::BusinessConfig;
    use frontdesk_core::domain::voice_agent::{AgentId, VoiceAgent, WebhookTool};

    use crate::error::ProviderError;
    use crate::VoiceAgentProvider;

    use super::AgentProviderClient;

    fn config() -> BusinessConfig {
        let business = Business::new(UserId("u-1".to_string()), "Acme Dental", Industry::Dental);
        let mut agent = VoiceAgent::new(business.id.clone(), &business.name);
        agent.tools.push(WebhookTool {
            id: "book_appointment".to_string(),
            url: "https://hooks.example.com/book".to_string(),
            enabled: true,
        });
        BusinessConfig::derive(&business, Some(&agent))
    }

    #[tokio::test]
    async fn create_agent_posts_compiled_payload_and_returns_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/agents")
            .match_header("authorization", "Bearer key-1")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "name": "Acme Dental Assistant",
                "voice": "sarah",
            })))
            .with_status(201)
            .with_body(r#"{"agent_id":"remote-9"}"#)
            .create_async()
            .await;

        let client = AgentProviderClient::new(server.url());
        let config = config();
        let tools = compile_tools(
            &[frontdesk_core::domain::voice_agent::WebhookTool {
                id: "book_appointment".to_string(),
                url: "https://hooks.example.com/book".to_string(),
                enabled: true,
            }],
            &config,
        );
        let agent_id = client.create_agent("key-1", &config, &tools).await.expect("create");
        assert_eq!(agent_id, AgentId("remote-9".to_string()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_agent_patches_prompt_and_first_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/v1/agents/remote-9")
            .with_status(200)
            .with_body("{}")
            .expect(2)
            .create_async()
            .await;

        let client = AgentProviderClient::new(server.url());
        let config = config();
        let agent_id = AgentId("remote-9".to_string());
        // idempotent: the same config twice sends the identical payload
        client.update_agent("key-1", &agent_id, &config).await.expect("first update");
        client.update_agent("key-1", &agent_id, &config).await.expect("second update");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_status_maps_to_credential_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/v1/agents/remote-9")
            .with_status(401)
            .with_body("bad key")
            .create_async()
            .await;

        let client = AgentProviderClient::new(server.url());
        let error = client
            .delete_agent("key-1", &AgentId("remote-9".to_string()))
            .await
            .expect_err("must fail");
        assert!(matches!(error, ProviderError::Credential { status: 401, .. }));
    }

    #[tokio::test]
    async fn validate_credential_swallows_transport_errors() {
        // nothing listens here; the probe must still resolve to false
        let client = AgentProviderClient::new("http://127.0.0.1:9");
        assert!(!client.validate_credential("key-1").await);
    }

    #[tokio::test]
    async fn validate_credential_true_on_200() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/v1/me").with_status(200).create_async().await;
        let client = AgentProviderClient::new(server.url());
        assert!(client.validate_credential("key-1").await);
    }

    #[tokio::test]
    async fn attach_knowledge_base_uploads_multipart_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/agents/remote-9/knowledge")
            .match_header(
                "content-type",
                mockito::Matcher::Regex("multipart/form-data.*".to_string()),
            )
            .with_status(200)
            .create_async()
            .await;

        let client = AgentProviderClient::new(server.url());
        client
            .attach_knowledge_base("key-1", &AgentId("remote-9".to_string()), &config())
            .await
            .expect("attach");
        mock.assert_async().await;
    }
}
