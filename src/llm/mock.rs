//! Mock LLM 客户端（用于测试与离线运行，无需 API）
//!
//! 取最后一条 User 消息，按关键词给出类别与优先级，回复为「一句说明 + JSON 对象」，
//! 模拟模型在 JSON 前后附带闲聊文字的常见情况。

use async_trait::async_trait;

use crate::core::LlmError;
use crate::llm::{last_user_content, LlmClient, Message};

const KEYWORDS: &[(&str, &[&str])] = &[
    ("medical", &["medic", "injur", "hospital", "doctor", "insulin", "bleeding", "wound"]),
    ("water", &["water", "thirst", "dehydrat"]),
    ("food", &["food", "hungry", "meal", "eat", "grocer"]),
    ("shelter", &["shelter", "roof", "tent", "homeless", "place to stay", "house"]),
];

const URGENT_WORDS: &[&str] = &["urgent", "emergency", "immediately", "asap", "critical", "dying"];

/// Mock 客户端：关键词分类
#[derive(Debug, Default)]
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let text = last_user_content(messages).unwrap_or("");
        let lower = text.to_lowercase();

        let need_type = KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(category, _)| *category)
            .unwrap_or("other");
        let urgent = URGENT_WORDS.iter().any(|w| lower.contains(w));
        let priority_score = if urgent { 85 } else { 40 };
        let title: String = text.split_whitespace().take(5).collect::<Vec<_>>().join(" ");

        let mut tags = vec![need_type];
        if urgent {
            tags.push("urgent");
        }
        let body = serde_json::json!({
            "title": title,
            "need_type": need_type,
            "priority_score": priority_score,
            "tags": tags,
            "notes": text,
        });

        Ok(format!("Here is the classification:\n{}\nLet me know if you need anything else.", body))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
