//! # 장르 데이터베이스 쿼리 모듈
//!
//! `genres` 테이블에 대한 CRUD 쿼리 함수들입니다.
//! 모든 함수는 `SqlitePool` 참조를 받아 비동기로 실행되며,
//! sqlx 에러는 `?`를 통해 `AppError::Database`로 변환됩니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 모든 장르를 이름 오름차순으로 조회합니다.
pub async fn list_genres(pool: &SqlitePool) -> Result<Vec<Genre>, AppError> {
    let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name ASC, id ASC")
        .fetch_all(pool)
        .await?;

    Ok(genres)
}

/// ID로 장르 하나를 조회합니다.
///
/// - `Ok(Some(Genre))`: 장르를 찾은 경우
/// - `Ok(None)`: 해당 ID의 장르가 없는 경우 (404 처리는 핸들러의 몫)
pub async fn get_genre(pool: &SqlitePool, id: &str) -> Result<Option<Genre>, AppError> {
    let genre = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(genre)
}

/// 이름이 정확히 일치하는 장르를 찾습니다.
///
/// SQLite의 기본 BINARY 비교라 대소문자를 구분합니다.
/// 이름은 고유 제약이 없으므로, 여러 개면 가장 먼저 만들어진(ID가 작은) 장르를 돌려줍니다.
pub async fn find_genre_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Genre>, AppError> {
    let genre = sqlx::query_as::<_, Genre>(
        "SELECT id, name FROM genres WHERE name = ? ORDER BY id ASC LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(genre)
}

/// 후보 장르를 새 레코드로 저장하고 저장된 장르를 반환합니다.
///
/// 후보에 ID가 있더라도 무시하고 새 UUIDv7을 부여합니다.
pub async fn create_genre(pool: &SqlitePool, candidate: &GenreCandidate) -> Result<Genre, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO genres (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(&candidate.name)
        .execute(pool)
        .await?;

    get_genre(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created genre".to_string()))
}

/// `id` 레코드의 이름을 후보의 이름으로 바꿉니다.
///
/// ## 반환값
/// - `Ok(Some(Genre))`: 수정 성공, 변경된 장르 반환
/// - `Ok(None)`: 해당 ID의 장르가 존재하지 않음
pub async fn update_genre(
    pool: &SqlitePool,
    id: &str,
    candidate: &GenreCandidate,
) -> Result<Option<Genre>, AppError> {
    let result = sqlx::query("UPDATE genres SET name = ? WHERE id = ?")
        .bind(&candidate.name)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_genre(pool, id).await
}

/// 장르를 삭제합니다. 삭제된 행이 있으면 true.
///
/// 참조하는 도서가 있는지는 호출하는 쪽에서 먼저 확인해야 합니다.
/// 확인 없이 호출하면 `book_genres`의 외래키 제약으로 DB 에러가 납니다.
pub async fn delete_genre(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM genres WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
