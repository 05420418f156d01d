//! Rapid Aid 服务入口
//!
//! 初始化日志、加载配置、构建分诊服务与存储，并启动 HTTP 接入层。
//!
//! 环境变量:
//! - GEMINI_API_KEY / OPENAI_API_KEY / DEEPSEEK_API_KEY: 对应 provider 的 API Key（缺失时使用 Mock）
//! - RAPID_AID__*: 覆盖配置项，如 RAPID_AID__SERVER__PORT=9000
//! - RUST_LOG: 日志级别
//!
//! 启动: cargo run --bin rapid-aid

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rapid_aid::config::{load_config, AppConfig};
use rapid_aid::intake::{create_router, IntakeState};
use rapid_aid::llm::create_llm_from_config;
use rapid_aid::observability;
use rapid_aid::store::RequestStore;
use rapid_aid::triage::TriageService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let llm = create_llm_from_config(&cfg);
    let triage = TriageService::from_llm(llm, Duration::from_secs(cfg.llm.timeouts.request));
    let store = RequestStore::with_anonymous_name(cfg.app.anonymous_name.clone());
    let state = Arc::new(IntakeState { triage, store });

    let app = create_router(state, cfg.server.cors_allow_any_origin);

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(
        "{} listening on http://{}",
        cfg.app.name.as_deref().unwrap_or("Rapid Aid"),
        listener.local_addr()?
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
