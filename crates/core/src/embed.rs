//! Copy-paste embed snippet referencing the remote agent id. Pure string
//! templating; it is a boundary artifact handed to end users, not a network
//! interface.

use crate::domain::voice_agent::AgentId;

pub fn embed_snippet(agent_id: &AgentId) -> String {
    format!(
        r#"<!-- Frontdesk voice widget -->
<script
  src="https://widget.frontdesk.example/v1/widget.js"
  data-agent-id="{id}"
  async
></script>
<div id="frontdesk-widget" data-agent-id="{id}"></div>"#,
        id = agent_id.0
    )
}

#[cfg(test)]
mod tests {
    use crate::domain::voice_agent::AgentId;

    use super::embed_snippet;

    #[test]
    fn snippet_references_agent_id_in_script_and_mount_node() {
        let snippet = embed_snippet(&AgentId("agent-42".to_string()));
        assert_eq!(snippet.matches("agent-42").count(), 2);
        assert!(snippet.contains("<script"));
    }
}
