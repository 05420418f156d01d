//! 模型网关：把不可靠的 LLM 调用包装成不会抛出的 Result
//!
//! 超时、传输错误与调用过程中的 panic 都转换为 GatewayFailure。

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;

use super::prompt::system_prompt;
use crate::core::GatewayFailure;
use crate::llm::{LlmClient, Message};

pub struct ModelGateway {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    timeout: Duration,
}

impl ModelGateway {
    pub fn new(llm: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self {
            llm,
            system_prompt: system_prompt(),
            timeout,
        }
    }

    /// 单次调用，返回模型原始文本
    pub async fn classify(&self, text: &str) -> Result<String, GatewayFailure> {
        let messages = [
            Message::system(self.system_prompt.clone()),
            Message::user(text),
        ];
        let call = AssertUnwindSafe(self.llm.complete(&messages)).catch_unwind();

        match tokio::time::timeout(self.timeout, call).await {
            Err(_) => Err(GatewayFailure::Timeout(self.timeout)),
            Ok(Err(_)) => Err(GatewayFailure::Panicked),
            Ok(Ok(Err(e))) => Err(GatewayFailure::Transport(e)),
            Ok(Ok(Ok(raw))) => Ok(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::core::LlmError;
    use crate::llm::Role;

    #[derive(Default)]
    struct RecordingClient {
        seen: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl LlmClient for RecordingClient {
        async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            Ok("{}".to_string())
        }
    }

    #[tokio::test]
    async fn test_classify_sends_prompt_then_request_text() {
        let client = Arc::new(RecordingClient::default());
        let gateway = ModelGateway::new(client.clone(), Duration::from_secs(1));

        assert_eq!(gateway.classify("no water since Monday").await.unwrap(), "{}");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].role, Role::System);
        assert_eq!(seen[0].content, system_prompt());
        assert_eq!(seen[1].role, Role::User);
        assert_eq!(seen[1].content, "no water since Monday");
    }
}
