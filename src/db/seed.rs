//! # 샘플 데이터 적재
//!
//! `SEED_SAMPLE_DATA`가 켜져 있으면 서버 시작 시 빈 카탈로그에 장르 몇 개와
//! 그 장르에 속한 도서를 넣습니다. 장르가 하나라도 있으면 아무것도 하지 않습니다.

use crate::{
    db::{BookStore, GenreStore},
    error::AppError,
    models::{GenreCandidate, NewBook},
};

const SAMPLE_GENRES: &[&str] = &["Fantasy", "Science Fiction", "French Poetry"];

/// (제목, 요약, ISBN, 장르 인덱스들)
const SAMPLE_BOOKS: &[(&str, &str, &str, &[usize])] = &[
    (
        "The Name of the Wind",
        "The story of Kvothe, told in his own words.",
        "9781473211896",
        &[0],
    ),
    (
        "The Wise Man's Fear",
        "Kvothe continues his search for the Chandrian.",
        "9788401352836",
        &[0],
    ),
    (
        "Apes and Angels",
        "Humankind's first contact, and what came after.",
        "9780765379528",
        &[1],
    ),
    (
        "Death Wave",
        "Ben Hutchins sets out after an alien wave of destruction.",
        "9780765379504",
        &[1],
    ),
];

/// 카탈로그가 비어 있으면 샘플 장르와 도서를 저장합니다.
///
/// 저장한 장르 수를 반환합니다. 이미 장르가 있으면 0.
pub async fn seed_sample_catalog<S>(store: &S) -> Result<usize, AppError>
where
    S: GenreStore + BookStore,
{
    if !store.list_genres().await?.is_empty() {
        tracing::debug!("Catalog already has genres, skipping sample data");
        return Ok(0);
    }

    let mut genre_ids = Vec::with_capacity(SAMPLE_GENRES.len());
    for &name in SAMPLE_GENRES {
        let candidate = GenreCandidate {
            id: None,
            name: name.to_string(),
        };
        genre_ids.push(store.create_genre(&candidate).await?.id);
    }

    for &(title, summary, isbn, genres) in SAMPLE_BOOKS {
        let book = NewBook {
            title: title.to_string(),
            summary: summary.to_string(),
            isbn: isbn.to_string(),
            genre_ids: genres.iter().map(|&i| genre_ids[i].clone()).collect(),
        };
        store.create_book(&book).await?;
    }

    tracing::info!(
        "Seeded {} genres and {} books",
        SAMPLE_GENRES.len(),
        SAMPLE_BOOKS.len()
    );
    Ok(SAMPLE_GENRES.len())
}
