//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /health` → `{ "status": "ok" }`
//!
//! 저장소에 `SELECT 1`을 보내 DB 연결까지 확인합니다.
//! 실패하면 중앙 에러 처리기가 500 에러 페이지를 반환합니다.

use crate::{error::AppError, routes::AppState};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /health` — 서버와 저장소 상태를 확인합니다.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.genres.ping().await?;
    Ok(Json(json!({
        "status": "ok"
    })))
}
