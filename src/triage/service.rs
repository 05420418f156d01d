//! TriageService：模型网关 + 修复层，对调用方是全函数
//!
//! 网关失败或修复过程 panic 时返回 TriageResult::fallback(text)，与修复层内部兜底完全一致。
//! 不做重试（重试在 LlmClient 层按配置装饰）。

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use super::gateway::ModelGateway;
use super::repair::{repair_with_outcome, RepairOutcome};
use super::types::TriageResult;
use crate::core::GatewayFailure;
use crate::llm::LlmClient;

/// 一次分诊走了哪条路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    Repaired(RepairOutcome),
    GatewayFailed(GatewayFailure),
    RepairPanicked,
}

pub struct TriageService {
    gateway: ModelGateway,
}

impl TriageService {
    pub fn new(gateway: ModelGateway) -> Self {
        Self { gateway }
    }

    pub fn from_llm(llm: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self::new(ModelGateway::new(llm, timeout))
    }

    pub async fn triage(&self, text: &str) -> TriageResult {
        self.triage_with_outcome(text).await.0
    }

    pub async fn triage_with_outcome(&self, text: &str) -> (TriageResult, TriageOutcome) {
        let raw = match self.gateway.classify(text).await {
            Ok(raw) => raw,
            Err(failure) => {
                tracing::warn!("Triage falling back: {}", failure);
                return (
                    TriageResult::fallback(text),
                    TriageOutcome::GatewayFailed(failure),
                );
            }
        };

        match catch_unwind(AssertUnwindSafe(|| repair_with_outcome(Some(&raw), text))) {
            Ok((result, outcome)) => {
                if let RepairOutcome::Fallback(reason) = &outcome {
                    tracing::debug!("Model output unusable ({:?}), using fallback record", reason);
                }
                (result, TriageOutcome::Repaired(outcome))
            }
            Err(_) => {
                tracing::error!("Repair panicked, using fallback record");
                (TriageResult::fallback(text), TriageOutcome::RepairPanicked)
            }
        }
    }
}
