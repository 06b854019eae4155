//! # Catalog 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성과 마이그레이션 (`SqliteStore::connect`)
//! 4. (선택) 샘플 데이터 적재
//! 5. 템플릿 로딩
//! 6. 라우터 설정 후 HTTP 서버 시작

use anyhow::Result;
use catalog::{
    build_router,
    config::Config,
    db::{seed::seed_sample_catalog, SqliteStore},
    views::TemplateViews,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 catalog, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting catalog server on {}:{}", config.host, config.port);

    let store = SqliteStore::connect(&config.database_url, config.max_connections).await?;
    if config.seed_sample_data {
        seed_sample_catalog(&store).await?;
    }
    let views = TemplateViews::new()?;

    if config.catalog.update_rejects_duplicate_names {
        tracing::info!("Genre updates reject names already used by another genre");
    }

    let state = AppState::new(store, views, config.catalog);
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
