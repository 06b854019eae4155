//! # 도서 데이터베이스 쿼리 모듈
//!
//! 장르 화면에서 필요한 도서 조회와, 초기 데이터/테스트용 도서 생성을 담당합니다.
//!
//! ```sql
//! books ←── book_genres ──→ genres
//!  (1)         (N:M)          (1)
//! ```

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 특정 장르를 참조하는 모든 도서를 제목순으로 조회합니다.
///
/// 장르가 존재하지 않아도 에러가 아니라 빈 Vec을 반환합니다.
pub async fn list_books_by_genre(pool: &SqlitePool, genre_id: &str) -> Result<Vec<Book>, AppError> {
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT b.id, b.title, b.summary, b.isbn
        FROM books b
        JOIN book_genres bg ON bg.book_id = b.id
        WHERE bg.genre_id = ?
        ORDER BY b.title ASC
        "#,
    )
    .bind(genre_id)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

/// 도서 하나와 장르 연결을 한 트랜잭션으로 저장합니다.
pub async fn create_book(pool: &SqlitePool, book: &NewBook) -> Result<Book, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO books (id, title, summary, isbn) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .execute(&mut *tx)
        .await?;

    for genre_id in &book.genre_ids {
        sqlx::query("INSERT OR IGNORE INTO book_genres (book_id, genre_id) VALUES (?, ?)")
            .bind(&id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Book {
        id,
        title: book.title.clone(),
        summary: book.summary.clone(),
        isbn: book.isbn.clone(),
    })
}
