use async_trait::async_trait;
use reqwest::StatusCode;
use schemars::{schema_for, JsonSchema};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::{config::Config, models::domain::Variation, services::prompt_builder::PromptText};

/// Failure classes for one gateway call. Rate-limit and quota denials are
/// distinguished so the endpoint can answer 429 and 402; everything else
/// is an attempt-level failure the orchestrator degrades around.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("gateway rate limited the request")]
    RateLimited,

    #[error("gateway quota exhausted")]
    QuotaExhausted,

    #[error("gateway returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway response carried no choices")]
    EmptyReply,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Raw payload of one completion: free text, a tool-call argument blob,
/// or both. The normalizer decides what is usable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionReply {
    pub text: Option<String>,
    pub tool_args: Option<String>,
}

/// A function-calling contract handed to the gateway so the provider
/// validates the output shape before returning it.
#[derive(Clone, Debug)]
pub struct ToolContract {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Shape the `submit_variations` tool asks the model to emit. Mirrors the
/// domain `Variation`/`SectionResult` structure.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VariationsPayload {
    pub variations: Vec<Variation>,
}

/// The one tool this service ever offers.
pub fn variations_tool() -> ToolContract {
    let schema = schema_for!(VariationsPayload);
    ToolContract {
        name: "submit_variations".to_string(),
        description: "Submit the generated variations, one result per requested section."
            .to_string(),
        parameters: serde_json::to_value(schema)
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" })),
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        prompt: PromptText,
        tool: Option<ToolContract>,
    ) -> Result<CompletionReply, GatewayError>;
}

// OpenAI-compatible wire subset. The gateway signals denial classes by
// HTTP status (429 rate limit, 402 credit exhaustion), so the request is
// sent directly and the status inspected before the body is parsed.

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ToolDefinition {
    #[serde(rename = "type")]
    kind: String,
    function: FunctionDefinition,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: ToolCallFunction,
}

#[derive(Debug, Deserialize)]
struct ToolCallFunction {
    arguments: String,
}

/// Production backend: one POST per attempt to the configured gateway's
/// chat-completions endpoint. Holds no state between calls.
pub struct HttpGatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl HttpGatewayClient {
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gateway_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
            api_key: config.gateway_api_key.clone(),
            model: config.gateway_model.clone(),
        })
    }

    fn build_body(&self, prompt: PromptText, tool: Option<ToolContract>) -> ChatCompletionRequest {
        let (tools, tool_choice) = match tool {
            Some(contract) => {
                let choice = serde_json::json!({
                    "type": "function",
                    "function": { "name": contract.name }
                });
                (
                    Some(vec![ToolDefinition {
                        kind: "function".to_string(),
                        function: FunctionDefinition {
                            name: contract.name,
                            description: contract.description,
                            parameters: contract.parameters,
                        },
                    }]),
                    Some(choice),
                )
            }
            None => (None, None),
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user,
                },
            ],
            temperature: 0.7,
            tools,
            tool_choice,
        }
    }
}

#[async_trait]
impl CompletionBackend for HttpGatewayClient {
    async fn complete(
        &self,
        prompt: PromptText,
        tool: Option<ToolContract>,
    ) -> Result<CompletionReply, GatewayError> {
        let body = self.build_body(prompt, tool);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::RateLimited);
        }
        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(GatewayError::QuotaExhausted);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_else(|_| String::new());
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyReply)?;

        let tool_args = choice
            .message
            .tool_calls
            .into_iter()
            .next()
            .map(|call| call.function.arguments);

        Ok(CompletionReply {
            text: choice.message.content,
            tool_args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variations_tool_contract_shape() {
        let tool = variations_tool();

        assert_eq!(tool.name, "submit_variations");
        let params = serde_json::to_string(&tool.parameters).unwrap();
        assert!(params.contains("variations"));
        assert!(params.contains("sectionId"));
    }

    #[test]
    fn test_request_body_forces_the_tool_choice() {
        let config = Config::test_config();
        let client = HttpGatewayClient::from_config(&config).unwrap();

        let body = client.build_body(
            PromptText {
                system: "s".into(),
                user: "u".into(),
            },
            Some(variations_tool()),
        );

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["tool_choice"]["function"]["name"], "submit_variations");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["model"], "test-model");
    }

    #[test]
    fn test_request_body_without_tool_omits_tool_fields() {
        let config = Config::test_config();
        let client = HttpGatewayClient::from_config(&config).unwrap();

        let body = client.build_body(
            PromptText {
                system: "s".into(),
                user: "u".into(),
            },
            None,
        );

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("tool_choice").is_none());
    }

    #[test]
    fn test_response_decoding_extracts_text_and_tool_args() {
        let raw = serde_json::json!({
            "id": "gen-123",
            "choices": [{
                "message": {
                    "content": "prose",
                    "tool_calls": [{
                        "id": "call-1",
                        "type": "function",
                        "function": { "name": "submit_variations", "arguments": "{\"variations\":[]}" }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let parsed: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        let choice = &parsed.choices[0];

        assert_eq!(choice.message.content.as_deref(), Some("prose"));
        assert_eq!(
            choice.message.tool_calls[0].function.arguments,
            "{\"variations\":[]}"
        );
    }

    #[test]
    fn test_response_decoding_tolerates_missing_tool_calls() {
        let raw = serde_json::json!({
            "choices": [{ "message": { "content": "just text" } }]
        });

        let parsed: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        assert!(parsed.choices[0].message.tool_calls.is_empty());
    }
}
