//! # 장르 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /catalog/genres | `genre_list` | 이름순 장르 목록 |
//! | GET | /catalog/genre/{id} | `genre_detail` | 장르와 소속 도서 |
//! | GET | /catalog/genre/create | `genre_create_get` | 빈 생성 폼 |
//! | POST | /catalog/genre/create | `genre_create_post` | 생성 제출 |
//! | GET | /catalog/genre/{id}/delete | `genre_delete_get` | 삭제 확인 화면 |
//! | POST | /catalog/genre/{id}/delete | `genre_delete_post` | 삭제 제출 (ID는 본문의 `genreid`) |
//! | GET | /catalog/genre/{id}/update | `genre_update_get` | 채워진 수정 폼 |
//! | POST | /catalog/genre/{id}/update | `genre_update_post` | 수정 제출 |
//!
//! 누락된 장르를 다루는 방식이 핸들러마다 다릅니다.
//! 상세/수정 화면과 삭제 제출은 404를, 삭제 확인 화면은 목록으로 조용히 리다이렉트합니다.

use crate::{
    error::AppError,
    models::*,
    routes::{AppState, HtmlForm},
    services::{
        genre_form::{process_genre_form, Step},
        validation::FieldError,
    },
};
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::{json, Value};
use std::convert::Infallible;

pub const LIST_TITLE: &str = "Genre List";
pub const DETAIL_TITLE: &str = "Genre Detail";
pub const CREATE_TITLE: &str = "Create Genre";
pub const UPDATE_TITLE: &str = "Update Genre";
pub const DELETE_TITLE: &str = "Delete Genre";

/// 수정 제출이 검증에 실패했을 때의 폼 제목.
/// 기존 동작 그대로 생성 제목을 씁니다. (DESIGN.md의 미결 사항 참고)
pub const UPDATE_FAILURE_TITLE: &str = CREATE_TITLE;

pub const DUPLICATE_NAME: &str = "Genre name already exists";

fn render(state: &AppState, view: &str, context: Value) -> Result<Html<String>, AppError> {
    Ok(Html(state.views.render(view, context)?))
}

/// 장르와 그 장르를 참조하는 도서를 동시에 조회합니다.
///
/// 두 쿼리는 서로 의존하지 않으므로 `try_join!`으로 함께 기다립니다.
/// 하나라도 실패하면 즉시 그 에러를 반환하고, 나머지 future는 drop됩니다.
async fn genre_with_books(state: &AppState, id: &str) -> Result<(Option<Genre>, Vec<Book>), AppError> {
    tokio::try_join!(state.genres.get_genre(id), state.books.list_books_by_genre(id))
}

/// `GET /catalog/genres` — 전체 장르를 이름 오름차순으로 보여줍니다.
pub async fn genre_list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let genres = state.genres.list_genres().await?;
    render(&state, "genre_list", json!({ "title": LIST_TITLE, "genre_list": genres }))
}

/// `GET /catalog/genre/{id}` — 장르 상세. 장르가 없으면 404.
pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let (genre, books) = genre_with_books(&state, &id).await?;
    let genre = genre.ok_or(AppError::NotFound("Genre"))?;

    render(
        &state,
        "genre_detail",
        json!({ "title": DETAIL_TITLE, "genre": genre, "genre_books": books }),
    )
}

/// `GET /catalog/genre/create` — 빈 생성 폼
pub async fn genre_create_get(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, "genre_form", json!({ "title": CREATE_TITLE }))
}

/// `POST /catalog/genre/create`
///
/// 폼 파이프라인을 통과하면 같은 이름의 장르가 있는지 먼저 확인합니다.
/// 있으면 새로 만들지 않고 기존 장르로, 없으면 저장 후 새 장르로 리다이렉트합니다.
pub async fn genre_create_post(
    State(state): State<AppState>,
    HtmlForm(form): HtmlForm<GenreForm>,
) -> Response {
    let decision = match process_genre_form(form, None).into_continue() {
        Ok(candidate) => save_new_genre(&state, candidate).await,
        Err(decision) => decision,
    };
    decision.respond(state.views.as_ref(), CREATE_TITLE)
}

async fn save_new_genre(state: &AppState, candidate: GenreCandidate) -> Step<Infallible> {
    match state.genres.find_genre_by_name(&candidate.name).await {
        Ok(Some(existing)) => {
            tracing::debug!("Genre {:?} already exists as {}", existing.name, existing.id);
            Step::Redirect(existing.url())
        }
        Ok(None) => match state.genres.create_genre(&candidate).await {
            Ok(genre) => {
                tracing::info!("Created genre {} ({:?})", genre.id, genre.name);
                Step::Redirect(genre.url())
            }
            Err(err) => Step::Fail(err),
        },
        Err(err) => Step::Fail(err),
    }
}

fn delete_page(state: &AppState, genre: &Genre, books: &[Book]) -> Result<Html<String>, AppError> {
    render(
        state,
        "genre_delete",
        json!({ "title": DELETE_TITLE, "genre": genre, "genre_books": books }),
    )
}

/// `GET /catalog/genre/{id}/delete` — 삭제 확인 화면.
/// 장르가 없으면 에러 없이 목록으로 돌아갑니다.
pub async fn genre_delete_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (genre, books) = genre_with_books(&state, &id).await?;
    let Some(genre) = genre else {
        return Ok(Redirect::to(GENRE_LIST_URL).into_response());
    };

    Ok(delete_page(&state, &genre, &books)?.into_response())
}

/// `POST /catalog/genre/{id}/delete`
///
/// 삭제 대상은 경로가 아니라 본문의 `genreid`입니다.
/// 이 장르를 참조하는 도서가 하나라도 있으면 삭제하지 않고 확인 화면을 다시 보여줍니다.
pub async fn genre_delete_post(
    State(state): State<AppState>,
    HtmlForm(form): HtmlForm<DeleteGenreForm>,
) -> Result<Response, AppError> {
    let id = form.genreid;
    let (genre, books) = genre_with_books(&state, &id).await?;
    let genre = genre.ok_or(AppError::NotFound("Genre"))?;

    if !books.is_empty() {
        tracing::debug!("Genre {} still has {} book(s), not deleting", id, books.len());
        return Ok(delete_page(&state, &genre, &books)?.into_response());
    }

    state.genres.delete_genre(&id).await?;
    tracing::info!("Deleted genre {} ({:?})", id, genre.name);
    Ok(Redirect::to(GENRE_LIST_URL).into_response())
}

/// `GET /catalog/genre/{id}/update` — 기존 값으로 채운 수정 폼. 장르가 없으면 404.
pub async fn genre_update_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let genre = state
        .genres
        .get_genre(&id)
        .await?
        .ok_or(AppError::NotFound("Genre"))?;

    render(&state, "genre_form", json!({ "title": UPDATE_TITLE, "genre": genre }))
}

/// `POST /catalog/genre/{id}/update`
///
/// 후보 장르는 본문의 hidden `id`(없으면 경로의 id)를 갖고,
/// 실제 갱신은 경로의 id 레코드에 적용합니다.
pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    HtmlForm(form): HtmlForm<GenreForm>,
) -> Response {
    let target_id = form.id.clone().unwrap_or_else(|| id.clone());
    let decision = match process_genre_form(form, Some(target_id)).into_continue() {
        Ok(candidate) => save_genre_update(&state, &id, candidate).await,
        Err(decision) => decision,
    };
    decision.respond(state.views.as_ref(), UPDATE_FAILURE_TITLE)
}

async fn save_genre_update(state: &AppState, id: &str, candidate: GenreCandidate) -> Step<Infallible> {
    if state.options.update_rejects_duplicate_names {
        match state.genres.find_genre_by_name(&candidate.name).await {
            Ok(Some(existing)) if existing.id != id => {
                let errors = vec![FieldError::new("name", DUPLICATE_NAME, &candidate.name)];
                return Step::RenderWithErrors { candidate, errors };
            }
            Ok(_) => {}
            Err(err) => return Step::Fail(err),
        }
    }

    match state.genres.update_genre(id, &candidate).await {
        Ok(Some(genre)) => {
            tracing::info!("Updated genre {} to {:?}", genre.id, genre.name);
            Step::Redirect(genre.url())
        }
        Ok(None) => Step::Fail(AppError::NotFound("Genre")),
        Err(err) => Step::Fail(err),
    }
}
