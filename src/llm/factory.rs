//! 按配置构建 LLM 客户端
//!
//! provider 决定后端与所需的 API Key 环境变量；Key 缺失时退回 Mock 并告警。
//! 外层始终包一层 RetryingLlmClient（max_retries 默认 0，即单次调用）。

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::llm::{
    create_deepseek_client, GeminiClient, LlmClient, MockLlmClient, OpenAiClient, RetryConfig,
    RetryingLlmClient, GEMINI_FLASH, OPENAI_DEFAULT_MODEL,
};

fn api_key(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|k| !k.trim().is_empty())
}

fn create_backend(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let base = cfg.llm.base_url.as_deref();

    match provider.as_str() {
        "gemini" => match api_key("GEMINI_API_KEY") {
            Some(key) => {
                let model = cfg.llm.model_or(GEMINI_FLASH);
                tracing::info!("Using Gemini LLM ({})", model);
                Arc::new(GeminiClient::new(base, model, &key))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set, using Mock LLM");
                Arc::new(MockLlmClient)
            }
        },
        "openai" => match api_key("OPENAI_API_KEY") {
            Some(key) => {
                let model = cfg.llm.model_or(OPENAI_DEFAULT_MODEL);
                tracing::info!("Using OpenAI LLM ({})", model);
                Arc::new(OpenAiClient::new(base, model, &key))
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not set, using Mock LLM");
                Arc::new(MockLlmClient)
            }
        },
        "deepseek" => match api_key("DEEPSEEK_API_KEY") {
            Some(key) => {
                let model = Some(cfg.llm.model_or("")).filter(|m| !m.is_empty());
                let client = create_deepseek_client(base, model, &key);
                tracing::info!("Using DeepSeek LLM ({})", client.name());
                Arc::new(client)
            }
            None => {
                tracing::warn!("DEEPSEEK_API_KEY not set, using Mock LLM");
                Arc::new(MockLlmClient)
            }
        },
        "mock" => Arc::new(MockLlmClient),
        other => {
            tracing::warn!("Unknown LLM provider '{}', using Mock LLM", other);
            Arc::new(MockLlmClient)
        }
    }
}

/// 从应用配置创建 LLM 客户端
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let retry = RetryConfig {
        max_retries: cfg.llm.retry.max_retries,
        initial_backoff: Duration::from_millis(cfg.llm.retry.initial_backoff_ms),
    };
    Arc::new(RetryingLlmClient::new(create_backend(cfg), retry))
}
