//! LLM 层：客户端抽象与实现（Gemini / OpenAI 兼容 / DeepSeek / Mock）

pub mod deepseek;
pub mod factory;
pub mod gemini;
pub mod message;
pub mod mock;
pub mod openai;
pub mod traits;

pub use deepseek::{create_deepseek_client, DEEPSEEK_CHAT};
pub use factory::create_llm_from_config;
pub use gemini::{GeminiClient, GEMINI_FLASH};
pub use message::{last_user_content, Message, Role};
pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, OPENAI_DEFAULT_MODEL};
pub use traits::{LlmClient, RetryConfig, RetryingLlmClient};
