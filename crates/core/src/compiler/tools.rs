use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::business_config::BusinessConfig;
use crate::domain::voice_agent::WebhookTool;

/// Provider-facing tool definition: a name, a natural-language description
/// the model reads, the webhook URL to call, and a JSON-schema request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub url: String,
    pub parameters: Value,
}

/// Compiles webhook-tool descriptors into provider tool schemas.
///
/// Only enabled descriptors with a non-empty URL are considered. Exactly
/// three ids are recognized; unrecognized ids are skipped without error so
/// newer descriptor kinds can ride through older deployments.
pub fn compile_tools(tools: &[WebhookTool], config: &BusinessConfig) -> Vec<ToolSchema> {
    tools
        .iter()
        .filter(|tool| tool.enabled && !tool.url.trim().is_empty())
        .filter_map(|tool| compile_tool(tool, config))
        .collect()
}

fn compile_tool(tool: &WebhookTool, config: &BusinessConfig) -> Option<ToolSchema> {
    let terms = &config.terms;
    match tool.id.as_str() {
        "check_history" => Some(ToolSchema {
            name: "check_history".to_string(),
            description: format!(
                "Look up an existing {customer}'s visit history by phone number.",
                customer = terms.customer
            ),
            url: tool.url.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "phone": {
                        "type": "string",
                        "description": format!("The {}'s phone number", terms.customer)
                    }
                },
                "required": ["phone"]
            }),
        }),
        "check_availability" => Some(ToolSchema {
            name: "check_availability".to_string(),
            description: format!(
                "Check open {appointment} slots for a given date.",
                appointment = terms.appointment
            ),
            url: tool.url.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "Requested date in YYYY-MM-DD format"
                    },
                    "time": {
                        "type": "string",
                        "description": "Preferred time of day, if any"
                    }
                },
                "required": ["date"]
            }),
        }),
        "book_appointment" => Some(ToolSchema {
            name: "book_appointment".to_string(),
            description: format!(
                "Book a new {appointment} for a {customer} once name, contact info, and the \
                 requested {service} are confirmed.",
                appointment = terms.appointment,
                customer = terms.customer,
                service = terms.service
            ),
            url: tool.url.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": format!("The {}'s full name", terms.customer)
                    },
                    "phone": {
                        "type": "string",
                        "description": format!("The {}'s phone number", terms.customer)
                    },
                    "service": {
                        "type": "string",
                        "description": format!("The {} being booked", terms.service)
                    },
                    "date": {
                        "type": "string",
                        "description": "Requested date in YYYY-MM-DD format"
                    },
                    "time": {
                        "type": "string",
                        "description": "Requested time"
                    }
                },
                "required": ["name", "phone", "service", "date", "time"]
            }),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::business::{Business, Industry, UserId};
    use crate::domain::business_config::BusinessConfig;
    use crate::domain::voice_agent::WebhookTool;

    use super::compile_tools;

    fn config() -> BusinessConfig {
        let business = Business::new(UserId("u-1".to_string()), "Acme Dental", Industry::Dental);
        BusinessConfig::derive(&business, None)
    }

    fn tool(id: &str, url: &str, enabled: bool) -> WebhookTool {
        WebhookTool { id: id.to_string(), url: url.to_string(), enabled }
    }

    #[test]
    fn recognized_tools_compile_with_vocabulary() {
        let tools = vec![
            tool("check_history", "https://hooks.example.com/history", true),
            tool("book_appointment", "https://hooks.example.com/book", true),
        ];
        let schemas = compile_tools(&tools, &config());
        assert_eq!(schemas.len(), 2);
        assert!(schemas[0].description.contains("patient"));
        assert!(schemas[1].description.contains("treatment"));
        let required = schemas[1].parameters["required"].as_array().expect("required list");
        assert!(required.iter().any(|v| v == "phone"));
    }

    #[test]
    fn unknown_ids_are_silently_skipped() {
        let tools = vec![
            tool("send_fax", "https://hooks.example.com/fax", true),
            tool("check_availability", "https://hooks.example.com/slots", true),
        ];
        let schemas = compile_tools(&tools, &config());
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name, "check_availability");
    }

    #[test]
    fn disabled_or_urlless_tools_are_excluded() {
        let tools = vec![
            tool("check_history", "https://hooks.example.com/history", false),
            tool("book_appointment", "   ", true),
        ];
        assert!(compile_tools(&tools, &config()).is_empty());
    }
}
