//! 错误类型
//!
//! - LlmError：传输层错误（超时、HTTP、API 返回异常、空响应）
//! - GatewayFailure：模型网关对上报告的失败，由 TriageService 本地恢复为兜底记录，不外抛
//! - StoreError / ValidationError：存储层校验失败，交由接入层返回给用户

use std::time::Duration;

use thiserror::Error;

/// LLM 客户端调用错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 响应信封里没有任何文本（如 candidates 为空）
    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// 是否值得重试（超时、网络错误、429 与 5xx）
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Timeout | LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// 模型网关失败：超时、传输错误或调用过程 panic，均视为同一类「无法分类」
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayFailure {
    #[error("Model gateway timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model gateway transport failed: {0}")]
    Transport(#[from] LlmError),

    #[error("Model gateway call panicked")]
    Panicked,
}

/// 用户可修正的输入错误：必填字段去空白后为空
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn empty(field: &'static str) -> Self {
        Self {
            field,
            message: "must not be empty".to_string(),
        }
    }
}

/// 存储层错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(LlmError::Timeout.is_transient());
        assert!(LlmError::Api { status: 503, message: "busy".into() }.is_transient());
        assert!(LlmError::Api { status: 429, message: "slow down".into() }.is_transient());
        assert!(!LlmError::Api { status: 400, message: "bad".into() }.is_transient());
        assert!(!LlmError::EmptyResponse.is_transient());
    }

    #[test]
    fn test_gateway_timeout_reports_sub_second_duration() {
        assert_eq!(
            GatewayFailure::Timeout(Duration::from_millis(250)).to_string(),
            "Model gateway timed out after 250ms"
        );
        assert_eq!(
            GatewayFailure::Timeout(Duration::from_secs(30)).to_string(),
            "Model gateway timed out after 30s"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = StoreError::from(ValidationError::empty("address"));
        assert_eq!(err.to_string(), "Validation failed: address must not be empty");
    }
}
