//! DeepSeek API 客户端（OpenAI 兼容格式）
//!
//! - Base URL: https://api.deepseek.com
//! - 模型: deepseek-chat（分类任务无需思考模式）

use crate::llm::OpenAiClient;

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_CHAT: &str = "deepseek-chat";

/// 创建 DeepSeek 客户端；model 缺省时用 DEEPSEEK_MODEL 环境变量，再缺省为 deepseek-chat
pub fn create_deepseek_client(
    base_url: Option<&str>,
    model: Option<&str>,
    api_key: &str,
) -> OpenAiClient {
    let model = deepseek_model(model, std::env::var("DEEPSEEK_MODEL").ok());
    OpenAiClient::new(Some(base_url.unwrap_or(DEEPSEEK_BASE_URL)), &model, api_key)
}

fn deepseek_model(configured: Option<&str>, from_env: Option<String>) -> String {
    configured
        .map(String::from)
        .or(from_env)
        .unwrap_or_else(|| DEEPSEEK_CHAT.to_string())
}
