//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 핸들러는 구체적인 DB가 아니라 두 저장소 트레이트에만 의존합니다.
//! - `GenreStore`: 장르 CRUD, 이름순 전체 조회, 이름으로 찾기
//! - `BookStore`: 장르 ID로 도서 찾기
//!
//! `SqliteStore`가 두 트레이트를 모두 구현하며, 실제 SQL은 하위 모듈에 있습니다.
//! - `genres`: `genres` 테이블 쿼리
//! - `books`: `books`, `book_genres` 테이블 쿼리
//! - `seed`: 빈 카탈로그에 샘플 장르/도서 적재

pub mod books;
pub mod genres;
pub mod seed;

use crate::{error::AppError, models::*};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// 장르 저장소 인터페이스
///
/// `Arc<dyn GenreStore>`로 `AppState`에 주입되므로 `Send + Sync`가 필요합니다.
/// 트레이트의 async fn을 dyn으로 쓰기 위해 `#[async_trait]`를 붙입니다.
#[async_trait]
pub trait GenreStore: Send + Sync {
    /// 모든 장르를 이름 오름차순으로
    async fn list_genres(&self) -> Result<Vec<Genre>, AppError>;
    async fn get_genre(&self, id: &str) -> Result<Option<Genre>, AppError>;
    /// 이름이 정확히 같은 장르
    async fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>, AppError>;
    /// 새 ID를 부여해 저장하고 저장된 장르를 반환
    async fn create_genre(&self, candidate: &GenreCandidate) -> Result<Genre, AppError>;
    /// `id` 레코드를 후보 값으로 갱신. 레코드가 없으면 None
    async fn update_genre(
        &self,
        id: &str,
        candidate: &GenreCandidate,
    ) -> Result<Option<Genre>, AppError>;
    /// 삭제된 행이 있으면 true
    async fn delete_genre(&self, id: &str) -> Result<bool, AppError>;
    /// 저장소 연결 확인 (헬스체크용)
    async fn ping(&self) -> Result<(), AppError>;
}

/// 도서 저장소 인터페이스
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn list_books_by_genre(&self, genre_id: &str) -> Result<Vec<Book>, AppError>;
    async fn create_book(&self, book: &NewBook) -> Result<Book, AppError>;
}

/// SQLite 기반 저장소
///
/// `SqlitePool`은 내부적으로 Arc를 쓰므로 clone해도 같은 풀을 공유합니다.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// 데이터베이스에 연결하고 마이그레이션까지 실행합니다.
    ///
    /// 파일 DB라면 상위 디렉토리를 먼저 만들고, 파일이 없으면 새로 생성합니다.
    /// `sqlite::memory:`도 받을 수 있어 테스트에서 그대로 사용합니다.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let parent = sqlite_file_path(database_url).and_then(|p| p.parent().map(Path::to_path_buf));
        if let Some(parent) = parent {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(&parent).await?;
                tracing::info!("Created database directory: {}", parent.display());
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// 이미 만들어진 풀을 감쌉니다. 마이그레이션은 실행하지 않습니다.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// `./migrations` 폴더의 SQL을 아직 실행하지 않은 것만 순서대로 실행합니다.
    pub async fn migrate(&self) -> Result<(), AppError> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// `sqlite:` URL에서 파일 경로 부분을 꺼냅니다. 메모리 DB면 None.
///
/// 예: `sqlite://data/catalog.db?mode=rwc` → `data/catalog.db`
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

#[async_trait]
impl GenreStore for SqliteStore {
    async fn list_genres(&self) -> Result<Vec<Genre>, AppError> {
        genres::list_genres(&self.pool).await
    }

    async fn get_genre(&self, id: &str) -> Result<Option<Genre>, AppError> {
        genres::get_genre(&self.pool, id).await
    }

    async fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>, AppError> {
        genres::find_genre_by_name(&self.pool, name).await
    }

    async fn create_genre(&self, candidate: &GenreCandidate) -> Result<Genre, AppError> {
        genres::create_genre(&self.pool, candidate).await
    }

    async fn update_genre(
        &self,
        id: &str,
        candidate: &GenreCandidate,
    ) -> Result<Option<Genre>, AppError> {
        genres::update_genre(&self.pool, id, candidate).await
    }

    async fn delete_genre(&self, id: &str) -> Result<bool, AppError> {
        genres::delete_genre(&self.pool, id).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        let _: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for SqliteStore {
    async fn list_books_by_genre(&self, genre_id: &str) -> Result<Vec<Book>, AppError> {
        books::list_books_by_genre(&self.pool, genre_id).await
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book, AppError> {
        books::create_book(&self.pool, book).await
    }
}
