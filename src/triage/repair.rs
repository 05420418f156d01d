//! 模型回复修复层
//!
//! repair(raw, original) 永不失败：
//! 1. 无回复 / 找不到 JSON 对象 / 解析失败 / 空对象 → 兜底记录（TriageResult::fallback）
//! 2. 否则逐字段取值，缺失或类型不对的字段用兜底默认值补齐（title 另要求非空白，值原样保留）
//! 3. need_type 小写后归入封闭类别集合，未识别归为 other（不走兜底）
//! 4. priority_score 必须是 [0, 100] 内的数值，否则取 50；小数向下取整
//! 5. 丢弃模型给出的 tags，按类别与优先级重新推导

use serde_json::{Map, Value};

use super::extract::extract_json_object;
use super::types::{default_title, Category, TriageResult, DEFAULT_PRIORITY, MAX_PRIORITY};

/// 走兜底路径的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoResponse,
    NoJsonObject,
    InvalidJson,
    EmptyObject,
}

/// 修复过程的诊断信息（仅用于日志与测试，不影响结果）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// 解析成功；`defaulted` 为缺失或无效而取默认值的字段
    Parsed { defaulted: Vec<&'static str> },
    Fallback(FallbackReason),
}

/// 修复模型输出，返回规范化的分诊结果
pub fn repair(raw: Option<&str>, original_message: &str) -> TriageResult {
    repair_with_outcome(raw, original_message).0
}

/// 同 repair，额外返回诊断信息
pub fn repair_with_outcome(
    raw: Option<&str>,
    original_message: &str,
) -> (TriageResult, RepairOutcome) {
    match parse_object(raw) {
        Ok(object) => {
            let (result, defaulted) = from_object(&object, original_message);
            (result, RepairOutcome::Parsed { defaulted })
        }
        Err(reason) => (
            TriageResult::fallback(original_message),
            RepairOutcome::Fallback(reason),
        ),
    }
}

fn parse_object(raw: Option<&str>) -> Result<Map<String, Value>, FallbackReason> {
    let raw = raw.ok_or(FallbackReason::NoResponse)?;
    let candidate = extract_json_object(raw).ok_or(FallbackReason::NoJsonObject)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) if object.is_empty() => Err(FallbackReason::EmptyObject),
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) | Err(_) => Err(FallbackReason::InvalidJson),
    }
}

fn from_object(
    object: &Map<String, Value>,
    original_message: &str,
) -> (TriageResult, Vec<&'static str>) {
    let mut defaulted = Vec::new();

    let title = match non_blank_str(object.get("title")) {
        Some(title) => title.to_string(),
        None => {
            defaulted.push("title");
            default_title(original_message)
        }
    };

    let category = match object.get("need_type").and_then(Value::as_str) {
        Some(need_type) => Category::parse(need_type),
        None => {
            defaulted.push("need_type");
            Category::Other
        }
    };

    let priority = match priority_from(object.get("priority_score")) {
        Some(priority) => priority,
        None => {
            defaulted.push("priority_score");
            DEFAULT_PRIORITY
        }
    };

    let notes = match object.get("notes").and_then(Value::as_str) {
        Some(notes) => notes.to_string(),
        None => {
            defaulted.push("notes");
            original_message.to_string()
        }
    };

    (TriageResult::derived(title, category, priority, notes), defaulted)
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// 接受数值或数值字符串；先按原值检查 [0, 100]，再向下取整
///
/// 向下取整保证 69.5 之类的原值不会越过紧急阈值。
fn priority_from(value: Option<&Value>) -> Option<u8> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !(0.0..=f64::from(MAX_PRIORITY)).contains(&number) {
        return None;
    }
    Some(number.floor() as u8)
}
