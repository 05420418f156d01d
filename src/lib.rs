//! Rapid Aid - 灾害救援请求分诊服务
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型
//! - **intake**: HTTP 接入层（axum，feature `web`）
//! - **llm**: LLM 客户端抽象与实现（Gemini / OpenAI 兼容 / DeepSeek / Mock）
//! - **observability**: 日志初始化
//! - **store**: 顺序 id、只追加的请求存储
//! - **triage**: 模型网关、回复修复层与分诊服务

pub mod config;
pub mod core;
#[cfg(feature = "web")]
pub mod intake;
pub mod llm;
pub mod observability;
pub mod store;
pub mod triage;

pub use store::{NewRequest, RequestStore, StoredRequest};
pub use triage::{Category, TriageResult, TriageService};
