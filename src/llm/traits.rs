//! LLM 客户端抽象
//!
//! 所有后端（Gemini / OpenAI 兼容 / DeepSeek / Mock）实现 LlmClient::complete（非流式）。
//! RetryingLlmClient 为可选的重试装饰器，默认配置下不重试。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::LlmError;
use crate::llm::Message;

/// LLM 客户端 trait：输入消息列表，返回模型原始文本
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// 后端名称，用于日志
    fn name(&self) -> &str {
        "llm"
    }
}

/// 重试策略：指数退避，仅对瞬时错误（超时、网络、429、5xx）重试
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

/// 重试装饰器
pub struct RetryingLlmClient {
    inner: Arc<dyn LlmClient>,
    config: RetryConfig,
}

impl RetryingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl LlmClient for RetryingLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let mut backoff = self.config.initial_backoff;
        let mut attempt = 0;
        loop {
            match self.inner.complete(messages).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        "{} failed ({}), retry {}/{} in {:?}",
                        self.inner.name(),
                        e,
                        attempt,
                        self.config.max_retries,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
