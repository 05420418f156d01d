//! 分类提示词
//!
//! 期望输出的 JSON Schema 由 schemars 生成并拼入 system prompt，减少模型输出格式错误。
//! 请求原文作为单独的 user 消息发送。

use schemars::{schema_for, JsonSchema};

use super::types::Category;

/// 模型应返回的对象（仅用于 Schema 生成）
#[allow(dead_code)]
#[derive(JsonSchema)]
struct ModelTriageFormat {
    /// 简短标题
    title: String,
    /// 需求类别
    need_type: Category,
    /// 0-100，越高越紧急
    priority_score: u8,
    /// 必须包含 need_type；仅在消息表明紧急时包含 "urgent"
    tags: Vec<String>,
    /// 原始消息
    notes: String,
}

const INSTRUCTIONS: &str = r#"You are a relief response AI.
Convert the user message into JSON with exactly these keys:
title, need_type, priority_score, tags, notes.

Rules:
- need_type must be one of ["water","food","shelter","medical","other"]
- priority_score 0-100 (higher = more urgent)
- tags must include the need_type. Include "urgent" only if the message indicates urgency.
- notes is the original message
"#;

/// 返回期望对象的 JSON Schema 字符串
pub fn triage_schema_json() -> String {
    let schema = schema_for!(ModelTriageFormat);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// 完整 system prompt：规则 + Schema
pub fn system_prompt() -> String {
    format!(
        "{INSTRUCTIONS}\nJSON Schema:\n{}\n\nReturn only JSON.",
        triage_schema_json()
    )
}
