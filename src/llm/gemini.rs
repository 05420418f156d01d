//! Gemini generateContent 客户端（reqwest + JSON）
//!
//! POST {base}/v1beta/models/{model}:generateContent?key=...
//! System 消息放入 systemInstruction，其余按 user / model 角色放入 contents。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::LlmError;
use crate::llm::{LlmClient, Message, Role};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_FLASH: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(String::from),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

/// 拼接首个 candidate 的全部 text part；没有任何文本视为信封异常
fn response_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(LlmError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: Option<&str>, model: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url
                .unwrap_or(GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn build_request(messages: &[Message]) -> GenerateContentRequest {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        let system_instruction = if system.is_empty() {
            None
        } else {
            Some(text_content(None, &system.join("\n\n")))
        };

        let contents = messages
            .iter()
            .filter_map(|m| match m.role {
                Role::User => Some(text_content(Some("user"), &m.content)),
                Role::Assistant => Some(text_content(Some("model"), &m.content)),
                Role::System => None,
            })
            .collect();

        GenerateContentRequest {
            system_instruction,
            contents,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::build_request(messages))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Other(format!("malformed response envelope: {e}")))?;
        response_text(body)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
