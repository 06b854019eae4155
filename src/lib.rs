//! # Catalog 라이브러리 크레이트
//!
//! 도서관 카탈로그의 장르(Genre) 화면을 제공하는 서버 렌더링 웹 애플리케이션입니다.
//! `main.rs`는 설정/로깅/DB 연결만 담당하고, 라우터 조립은 여기의 `build_router`가 합니다.
//! 통합 테스트(`tests/`)도 같은 `build_router`로 앱을 만듭니다.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

use axum::{response::Redirect, routing::get, Router};
use models::GENRE_LIST_URL;
use routes::*;
use tower_http::trace::TraceLayer;

pub use routes::AppState;

/// 모든 라우트를 등록한 Router를 만듭니다.
///
/// axum 0.8은 경로 파라미터를 `{id}`로 씁니다.
/// `/catalog/genre/create`처럼 고정 경로는 `{id}`보다 먼저 매칭됩니다.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(GENRE_LIST_URL) }))
        .route(GENRE_LIST_URL, get(genre_list))
        .route(
            "/catalog/genre/create",
            get(genre_create_get).post(genre_create_post),
        )
        .route("/catalog/genre/{id}", get(genre_detail))
        .route(
            "/catalog/genre/{id}/delete",
            get(genre_delete_get).post(genre_delete_post),
        )
        .route(
            "/catalog/genre/{id}/update",
            get(genre_update_get).post(genre_update_post),
        )
        .route("/health", get(health_check))
        .with_state(state)
        // HTTP 요청/응답 자동 로깅
        .layer(TraceLayer::new_for_http())
}
