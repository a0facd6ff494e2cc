use chrono::Utc;
use sqlx::Row;

use frontdesk_core::domain::business::BusinessId;
use frontdesk_core::domain::voice_agent::{AgentId, VoiceAgent, VoiceAgentId};

use super::business::parse_timestamp;
use super::{RepositoryError, VoiceAgentRepository};
use crate::DbPool;

pub struct SqlVoiceAgentRepository {
    pool: DbPool,
}

impl SqlVoiceAgentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_agent(row: &sqlx::sqlite::SqliteRow) -> Result<VoiceAgent, RepositoryError> {
    let get = |column: &str| -> Result<String, RepositoryError> {
        row.try_get(column).map_err(|e| RepositoryError::Decode(e.to_string()))
    };
    let agent_id: Option<String> =
        row.try_get("agent_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let tools_raw = get("tools")?;

    Ok(VoiceAgent {
        id: VoiceAgentId(get("id")?),
        business_id: BusinessId(get("business_id")?),
        agent_id: agent_id.filter(|id| !id.is_empty()).map(AgentId),
        name: get("name")?,
        personality: get("personality")?,
        system_prompt: get("system_prompt")?,
        first_message: get("first_message")?,
        provider_api_key: get("provider_api_key")?,
        generator_api_key: get("generator_api_key")?,
        booking_link: get("booking_link")?,
        tools: serde_json::from_str(&tools_raw).unwrap_or_default(),
        created_at: parse_timestamp(&get("created_at")?),
        updated_at: parse_timestamp(&get("updated_at")?),
    })
}

#[async_trait::async_trait]
impl VoiceAgentRepository for SqlVoiceAgentRepository {
    async fn find_by_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Option<VoiceAgent>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, business_id, agent_id, name, personality, system_prompt,
                    first_message, provider_api_key, generator_api_key, booking_link,
                    tools, created_at, updated_at
             FROM voice_agent WHERE business_id = ?",
        )
        .bind(&business_id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_agent(r)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, agent: &VoiceAgent) -> Result<(), RepositoryError> {
        let tools = serde_json::to_string(&agent.tools)
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;

        sqlx::query(
            "INSERT INTO voice_agent (id, business_id, agent_id, name, personality,
                                      system_prompt, first_message, provider_api_key,
                                      generator_api_key, booking_link, tools,
                                      created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 agent_id = excluded.agent_id,
                 name = excluded.name,
                 personality = excluded.personality,
                 system_prompt = excluded.system_prompt,
                 first_message = excluded.first_message,
                 provider_api_key = excluded.provider_api_key,
                 generator_api_key = excluded.generator_api_key,
                 booking_link = excluded.booking_link,
                 tools = excluded.tools,
                 updated_at = excluded.updated_at",
        )
        .bind(&agent.id.0)
        .bind(&agent.business_id.0)
        .bind(agent.agent_id.as_ref().map(|id| id.0.as_str()))
        .bind(&agent.name)
        .bind(&agent.personality)
        .bind(&agent.system_prompt)
        .bind(&agent.first_message)
        .bind(&agent.provider_api_key)
        .bind(&agent.generator_api_key)
        .bind(&agent.booking_link)
        .bind(tools)
        .bind(agent.created_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_remote_agent_id(
        &self,
        id: &VoiceAgentId,
        agent_id: &AgentId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE voice_agent SET agent_id = ?, updated_at = ? WHERE id = ?")
            .bind(&agent_id.0)
            .bind(Utc::now().to_rfc3339())
            .bind(&id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &VoiceAgentId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM voice_agent WHERE id = ?")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use frontdesk_core::domain::business::{Business, Industry, UserId};
    use frontdesk_core::domain::voice_agent::{AgentId, VoiceAgent, WebhookTool};

    use super::super::{BusinessRepository, SqlBusinessRepository, VoiceAgentRepository};
    use super::SqlVoiceAgentRepository;
    use crate::connection::memory_pool;
    use crate::{migrations, DbPool};

    async fn setup() -> (DbPool, Business) {
        let pool = memory_pool().await;
        migrations::run_pending(&pool).await.expect("migrate");
        let business = SqlBusinessRepository::new(pool.clone())
            .create(Business::new(UserId("u-1".to_string()), "Acme Dental", Industry::Dental))
            .await
            .expect("create business");
        (pool, business)
    }

    #[tokio::test]
    async fn save_and_load_round_trips_tools_and_null_agent_id() {
        let (pool, business) = setup().await;
        let repo = SqlVoiceAgentRepository::new(pool);

        let mut agent = VoiceAgent::new(business.id.clone(), &business.name);
        agent.tools.push(WebhookTool {
            id: "book_appointment".to_string(),
            url: "https://hooks.example.com/book".to_string(),
            enabled: true,
        });
        repo.save(&agent).await.expect("save");

        let loaded = repo
            .find_by_business(&business.id)
            .await
            .expect("find")
            .expect("agent exists");
        assert!(loaded.agent_id.is_none());
        assert_eq!(loaded.tools.len(), 1);
        assert_eq!(loaded.name, "Acme Dental Assistant");
    }

    #[tokio::test]
    async fn set_remote_agent_id_links_the_row() {
        let (pool, business) = setup().await;
        let repo = SqlVoiceAgentRepository::new(pool);

        let agent = VoiceAgent::new(business.id.clone(), &business.name);
        repo.save(&agent).await.expect("save");
        repo.set_remote_agent_id(&agent.id, &AgentId("remote-7".to_string()))
            .await
            .expect("link");

        let loaded = repo
            .find_by_business(&business.id)
            .await
            .expect("find")
            .expect("agent exists");
        assert_eq!(loaded.agent_id, Some(AgentId("remote-7".to_string())));
    }

    #[tokio::test]
    async fn deleting_business_cascades_to_agent() {
        let (pool, business) = setup().await;
        let agents = SqlVoiceAgentRepository::new(pool.clone());
        let businesses = SqlBusinessRepository::new(pool);

        let agent = VoiceAgent::new(business.id.clone(), &business.name);
        agents.save(&agent).await.expect("save");

        businesses.delete(&business.id).await.expect("delete business");
        let loaded = agents.find_by_business(&business.id).await.expect("find");
        assert!(loaded.is_none());
    }
}
