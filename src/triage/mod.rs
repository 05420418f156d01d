//! 分诊：模型网关 → 修复层 → 规范化的 TriageResult
//!
//! - **types**: Category / TagSet / TriageResult 与兜底记录
//! - **extract**: 从模型回复中定位 JSON 对象
//! - **repair**: 补齐字段、归一类别、校验优先级、重算标签
//! - **gateway**: 带超时与 panic 隔离的单次模型调用
//! - **service**: 对外的全函数 triage(text)

pub mod extract;
pub mod gateway;
pub mod prompt;
pub mod repair;
pub mod service;
pub mod types;

pub use extract::extract_json_object;
pub use gateway::ModelGateway;
pub use repair::{repair, repair_with_outcome, FallbackReason, RepairOutcome};
pub use service::{TriageOutcome, TriageService};
pub use types::{
    Category, TagSet, TriageResult, DEFAULT_PRIORITY, URGENT_TAG, URGENT_THRESHOLD,
};
