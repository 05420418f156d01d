//! HTTP 接入层（axum）
//!
//! - POST /api/requests     表单提交（name?、address、request_text），先分诊再存储
//! - GET  /api/requests     全部记录（可按 category / urgent 过滤）
//! - GET  /api/requests/:id 单条记录
//! - GET  /api/stats        统计
//! - GET  /                 存活检查

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::{StoreError, ValidationError};
use crate::store::{NewRequest, RequestStore, StoreStats, StoredRequest};
use crate::triage::{Category, TriageService};

/// 接入层共享状态
pub struct IntakeState {
    pub triage: TriageService,
    pub store: RequestStore,
}

/// GET /api/requests 过滤参数
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub urgent: Option<bool>,
}

/// 用户可修正的输入错误 → 422
#[derive(Debug)]
pub struct IntakeError(ValidationError);

impl From<ValidationError> for IntakeError {
    fn from(e: ValidationError) -> Self {
        Self(e)
    }
}

impl From<StoreError> for IntakeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => Self(v),
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "field": self.0.field,
        });
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

/// 创建路由
pub fn create_router(state: Arc<IntakeState>, cors_allow_any_origin: bool) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/api/requests", get(list_requests).post(create_request))
        .route("/api/requests/:id", get(get_request))
        .route("/api/stats", get(stats))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_allow_any_origin {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Rapid Aid Matcher Backend is running." }))
}

/// POST /api/requests：校验必填字段 → 分诊（不持锁）→ 追加
async fn create_request(
    State(state): State<Arc<IntakeState>>,
    Form(submission): Form<NewRequest>,
) -> Result<Json<StoredRequest>, IntakeError> {
    submission.validate()?;

    let triage = state.triage.triage(submission.request_text.trim()).await;
    let stored = state.store.append(submission, triage).await?;
    Ok(Json(stored))
}

async fn list_requests(
    State(state): State<Arc<IntakeState>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<StoredRequest>> {
    let category = query.category.as_deref().map(Category::parse);
    let records = state
        .store
        .list_all()
        .await
        .into_iter()
        .filter(|r| category.map_or(true, |c| r.triage.category == c))
        .filter(|r| query.urgent.map_or(true, |u| r.triage.is_urgent() == u))
        .collect();
    Json(records)
}

async fn get_request(
    State(state): State<Arc<IntakeState>>,
    Path(id): Path<u64>,
) -> Result<Json<StoredRequest>, StatusCode> {
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn stats(State(state): State<Arc<IntakeState>>) -> Json<StoreStats> {
    Json(state.store.stats().await)
}
