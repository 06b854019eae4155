use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use catalog::{
    build_router,
    config::CatalogOptions,
    db::{BookStore, GenreStore, SqliteStore},
    error::AppError,
    models::{Book, Genre, GenreCandidate, NewBook},
    views::TemplateViews,
    AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

async fn test_app_with(options: CatalogOptions) -> (Router, SqliteStore) {
    let store = SqliteStore::connect("sqlite::memory:", 1).await.expect("db");
    let views = TemplateViews::new().expect("templates");
    let app = build_router(AppState::new(store.clone(), views, options));
    (app, store)
}

async fn test_app() -> (Router, SqliteStore) {
    test_app_with(CatalogOptions::default()).await
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    Reply {
        status,
        location,
        body: String::from_utf8(bytes.to_vec()).expect("utf8"),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request")
}

async fn seed_genre(store: &SqliteStore, name: &str) -> Genre {
    store
        .create_genre(&GenreCandidate {
            id: None,
            name: name.to_string(),
        })
        .await
        .expect("genre")
}

async fn seed_book(store: &SqliteStore, title: &str, genre: &Genre) -> Book {
    store
        .create_book(&NewBook {
            title: title.to_string(),
            summary: format!("{title} summary"),
            genre_ids: vec![genre.id.clone()],
            ..Default::default()
        })
        .await
        .expect("book")
}

async fn genre_names(store: &SqliteStore) -> Vec<String> {
    store
        .list_genres()
        .await
        .expect("list")
        .into_iter()
        .map(|g| g.name)
        .collect()
}

fn assert_in_order(body: &str, names: &[&str]) {
    let positions: Vec<usize> = names
        .iter()
        .map(|n| body.find(n).unwrap_or_else(|| panic!("{n} missing from page")))
        .collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "expected {names:?} in order, positions {positions:?}"
    );
}

#[tokio::test]
async fn root_redirects_to_genre_list() {
    let (app, _store) = test_app().await;
    let reply = send(&app, get("/")).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/genres"));
}

#[tokio::test]
async fn health_reports_ok_when_store_is_ready() {
    let (app, _store) = test_app().await;
    let reply = send(&app, get("/health")).await;
    assert_eq!(reply.status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&reply.body).expect("json");
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn list_shows_genres_sorted_by_name() {
    let (app, store) = test_app().await;
    for name in ["Poetry", "Fantasy", "Drama", "Biography"] {
        seed_genre(&store, name).await;
    }

    let reply = send(&app, get("/catalog/genres")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("<h1>Genre List</h1>"));
    assert_in_order(&reply.body, &["Biography", "Drama", "Fantasy", "Poetry"]);
}

#[tokio::test]
async fn create_form_is_empty() {
    let (app, _store) = test_app().await;
    let reply = send(&app, get("/catalog/genre/create")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("<h1>Create Genre</h1>"));
    assert!(reply.body.contains("value=\"\""));
    assert!(!reply.body.contains("class=\"errors\""));
}

#[tokio::test]
async fn create_trims_name_and_redirects_to_new_genre() {
    let (app, store) = test_app().await;
    seed_genre(&store, "Fantasy").await;
    seed_genre(&store, "Drama").await;

    let reply = send(&app, post_form("/catalog/genre/create", "name=%20Sci-Fi%20")).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);

    let created = store
        .find_genre_by_name("Sci-Fi")
        .await
        .expect("find")
        .expect("created");
    assert_eq!(reply.location, Some(created.url()));
    assert_eq!(genre_names(&store).await, ["Drama", "Fantasy", "Sci-Fi"]);

    let list = send(&app, get("/catalog/genres")).await;
    assert_in_order(&list.body, &["Drama", "Fantasy", "Sci-Fi"]);
}

#[tokio::test]
async fn create_with_blank_name_rerenders_form_without_saving() {
    let (app, store) = test_app().await;

    for form in ["name=%20%20%20", "name=", "", "name=%EF%BB%BF%20"] {
        let reply = send(&app, post_form("/catalog/genre/create", form)).await;
        assert_eq!(reply.status, StatusCode::OK, "form {form:?}");
        assert!(reply.location.is_none());
        assert!(reply.body.contains("<h1>Create Genre</h1>"));
        assert!(reply.body.contains("Genre name required"));
    }

    assert!(genre_names(&store).await.is_empty());
}

#[tokio::test]
async fn create_with_existing_name_redirects_to_existing_genre() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;

    let reply = send(&app, post_form("/catalog/genre/create", "name=+Drama+")).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location, Some(drama.url()));
    assert_eq!(genre_names(&store).await, ["Drama"]);
}

#[tokio::test]
async fn create_stores_escaped_name_and_pages_do_not_double_escape() {
    let (app, store) = test_app().await;

    let reply = send(&app, post_form("/catalog/genre/create", "name=Rock+%26+Roll")).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(genre_names(&store).await, ["Rock &amp; Roll"]);

    let list = send(&app, get("/catalog/genres")).await;
    assert!(list.body.contains("Rock &amp; Roll"));
    assert!(!list.body.contains("&amp;amp;"));

    // 같은 원본 입력은 같은 정제 결과로 매칭되어 중복 생성되지 않습니다.
    let again = send(&app, post_form("/catalog/genre/create", "name=Rock+%26+Roll")).await;
    assert_eq!(again.status, StatusCode::SEE_OTHER);
    assert_eq!(genre_names(&store).await.len(), 1);
}

#[tokio::test]
async fn detail_shows_genre_with_its_books() {
    let (app, store) = test_app().await;
    let fantasy = seed_genre(&store, "Fantasy").await;
    let drama = seed_genre(&store, "Drama").await;
    seed_book(&store, "The Wise Man's Fear", &fantasy).await;
    seed_book(&store, "Death of a Salesman", &drama).await;

    let reply = send(&app, get(&fantasy.url())).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("<h1>Genre Detail</h1>"));
    assert!(reply.body.contains("Genre: Fantasy"));
    assert!(reply.body.contains("The Wise Man&#x27;s Fear"));
    assert!(!reply.body.contains("Death of a Salesman"));
}

#[tokio::test]
async fn detail_of_missing_genre_is_not_found() {
    let (app, _store) = test_app().await;
    let reply = send(&app, get("/catalog/genre/does-not-exist")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.body.contains("Genre not found"));
}

#[tokio::test]
async fn delete_form_of_missing_genre_redirects_to_list() {
    let (app, _store) = test_app().await;
    let reply = send(&app, get("/catalog/genre/does-not-exist/delete")).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/genres"));
}

#[tokio::test]
async fn delete_form_asks_for_confirmation() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;

    let reply = send(&app, get(&format!("{}/delete", drama.url()))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("<h1>Delete Genre</h1>"));
    assert!(reply.body.contains("Do you really want to delete this genre?"));
    assert!(reply.body.contains(&format!("value=\"{}\"", drama.id)));
}

#[tokio::test]
async fn delete_removes_genre_without_books() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;
    let poetry = seed_genre(&store, "Poetry").await;

    let reply = send(
        &app,
        post_form(&format!("{}/delete", drama.url()), &format!("genreid={}", drama.id)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/genres"));

    assert!(store.get_genre(&drama.id).await.expect("get").is_none());
    assert_eq!(store.get_genre(&poetry.id).await.expect("get"), Some(poetry));
    let detail = send(&app, get(&drama.url())).await;
    assert_eq!(detail.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_uses_body_identifier_not_path() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;
    let poetry = seed_genre(&store, "Poetry").await;

    let reply = send(
        &app,
        post_form(&format!("{}/delete", drama.url()), &format!("genreid={}", poetry.id)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert!(store.get_genre(&poetry.id).await.expect("get").is_none());
    assert_eq!(store.get_genre(&drama.id).await.expect("get"), Some(drama));
}

#[tokio::test]
async fn delete_with_books_keeps_genre_and_lists_them() {
    let (app, store) = test_app().await;
    let fantasy = seed_genre(&store, "Fantasy").await;
    seed_book(&store, "The Name of the Wind", &fantasy).await;

    let reply = send(
        &app,
        post_form(&format!("{}/delete", fantasy.url()), &format!("genreid={}", fantasy.id)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.location.is_none());
    assert!(reply.body.contains("<h1>Delete Genre</h1>"));
    assert!(reply.body.contains("Delete the following books"));
    assert!(reply.body.contains("The Name of the Wind"));
    assert_eq!(store.get_genre(&fantasy.id).await.expect("get"), Some(fantasy));
}

#[tokio::test]
async fn delete_of_missing_genre_is_not_found() {
    let (app, _store) = test_app().await;
    let reply = send(&app, post_form("/catalog/genre/x/delete", "genreid=x")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_without_genreid_gets_html_error_page() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;

    let reply = send(&app, post_form(&format!("{}/delete", drama.url()), "")).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.body.contains("<!DOCTYPE html>"));
    assert!(reply.body.contains("The submitted form could not be read"));
    assert!(reply.body.contains("<h2>422</h2>"));
    assert_eq!(genre_names(&store).await, ["Drama"]);
}

#[tokio::test]
async fn repeated_form_field_gets_html_error_page() {
    let (app, store) = test_app().await;

    let reply = send(&app, post_form("/catalog/genre/create", "name=Drama&name=Poetry")).await;
    assert!(reply.status.is_client_error(), "{}", reply.status);
    assert!(reply.body.contains("The submitted form could not be read"));
    assert!(genre_names(&store).await.is_empty());
}

#[tokio::test]
async fn non_form_content_type_gets_html_error_page() {
    let (app, store) = test_app().await;
    let request = Request::post("/catalog/genre/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Drama"}"#))
        .expect("request");

    let reply = send(&app, request).await;
    assert_eq!(reply.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(reply.body.contains("The submitted form could not be read"));
    assert!(reply.body.contains("<h2>415</h2>"));
    assert!(genre_names(&store).await.is_empty());
}

#[tokio::test]
async fn update_form_is_prefilled() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;

    let reply = send(&app, get(&format!("{}/update", drama.url()))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("<h1>Update Genre</h1>"));
    assert!(reply.body.contains("value=\"Drama\""));
    assert!(reply.body.contains(&format!("name=\"id\" value=\"{}\"", drama.id)));
}

#[tokio::test]
async fn update_form_of_missing_genre_is_not_found() {
    let (app, _store) = test_app().await;
    let reply = send(&app, get("/catalog/genre/nope/update")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_blank_name_keeps_record_and_create_title() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;

    let reply = send(
        &app,
        post_form(&format!("{}/update", drama.url()), &format!("name=++&id={}", drama.id)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Genre name required"));
    // 검증 실패 시 제목은 기존 동작 그대로 "Create Genre"입니다.
    assert!(reply.body.contains("<h1>Create Genre</h1>"));
    assert!(reply.body.contains(&format!("value=\"{}\"", drama.id)));
    assert_eq!(store.get_genre(&drama.id).await.expect("get"), Some(drama));
}

#[tokio::test]
async fn update_changes_only_the_target_genre() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;
    let poetry = seed_genre(&store, "Poetry").await;

    let reply = send(
        &app,
        post_form(
            &format!("{}/update", drama.url()),
            &format!("name=+Tragedy+&id={}", drama.id),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location, Some(drama.url()));

    let updated = store.get_genre(&drama.id).await.expect("get").expect("exists");
    assert_eq!(updated.name, "Tragedy");
    assert_eq!(store.get_genre(&poetry.id).await.expect("get"), Some(poetry));
}

#[tokio::test]
async fn update_without_body_id_targets_path_genre() {
    let (app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;

    let reply = send(&app, post_form(&format!("{}/update", drama.url()), "name=Comedy")).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    let updated = store.get_genre(&drama.id).await.expect("get").expect("exists");
    assert_eq!(updated.name, "Comedy");
}

#[tokio::test]
async fn update_of_missing_genre_is_not_found() {
    let (app, store) = test_app().await;
    let reply = send(&app, post_form("/catalog/genre/nope/update", "name=Comedy")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(genre_names(&store).await.is_empty());
}

#[tokio::test]
async fn update_allows_duplicate_names_by_default() {
    let (app, store) = test_app().await;
    seed_genre(&store, "Drama").await;
    let poetry = seed_genre(&store, "Poetry").await;

    let reply = send(&app, post_form(&format!("{}/update", poetry.url()), "name=Drama")).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(genre_names(&store).await, ["Drama", "Drama"]);
}

#[tokio::test]
async fn update_rejects_duplicate_names_when_configured() {
    let (app, store) = test_app_with(CatalogOptions {
        update_rejects_duplicate_names: true,
    })
    .await;
    seed_genre(&store, "Drama").await;
    let poetry = seed_genre(&store, "Poetry").await;

    let reply = send(&app, post_form(&format!("{}/update", poetry.url()), "name=Drama")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Genre name already exists"));
    assert_eq!(genre_names(&store).await, ["Drama", "Poetry"]);

    // 자기 자신의 이름으로 다시 저장하는 것은 중복이 아닙니다.
    let same = send(&app, post_form(&format!("{}/update", poetry.url()), "name=Poetry")).await;
    assert_eq!(same.status, StatusCode::SEE_OTHER);
}

/// 모든 호출이 DB 에러로 실패하는 저장소
#[derive(Clone)]
struct BrokenStore;

fn broken() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl GenreStore for BrokenStore {
    async fn list_genres(&self) -> Result<Vec<Genre>, AppError> {
        Err(broken())
    }
    async fn get_genre(&self, _id: &str) -> Result<Option<Genre>, AppError> {
        Err(broken())
    }
    async fn find_genre_by_name(&self, _name: &str) -> Result<Option<Genre>, AppError> {
        Err(broken())
    }
    async fn create_genre(&self, _candidate: &GenreCandidate) -> Result<Genre, AppError> {
        Err(broken())
    }
    async fn update_genre(
        &self,
        _id: &str,
        _candidate: &GenreCandidate,
    ) -> Result<Option<Genre>, AppError> {
        Err(broken())
    }
    async fn delete_genre(&self, _id: &str) -> Result<bool, AppError> {
        Err(broken())
    }
    async fn ping(&self) -> Result<(), AppError> {
        Err(broken())
    }
}

#[async_trait]
impl BookStore for BrokenStore {
    async fn list_books_by_genre(&self, _genre_id: &str) -> Result<Vec<Book>, AppError> {
        Err(broken())
    }
    async fn create_book(&self, _book: &NewBook) -> Result<Book, AppError> {
        Err(broken())
    }
}

fn broken_app() -> Router {
    let views = TemplateViews::new().expect("templates");
    build_router(AppState::new(BrokenStore, views, CatalogOptions::default()))
}

#[tokio::test]
async fn store_failures_become_error_pages() {
    let app = broken_app();

    for request in [
        get("/catalog/genres"),
        get("/catalog/genre/g1"),
        get("/catalog/genre/g1/delete"),
        get("/catalog/genre/g1/update"),
        get("/health"),
        post_form("/catalog/genre/create", "name=Drama"),
        post_form("/catalog/genre/g1/update", "name=Drama"),
        post_form("/catalog/genre/g1/delete", "genreid=g1"),
    ] {
        let uri = request.uri().to_string();
        let reply = send(&app, request).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(reply.body.contains("A database error occurred"), "{uri}");
    }
}

#[tokio::test]
async fn validation_failure_never_reaches_the_store() {
    let app = broken_app();
    let reply = send(&app, post_form("/catalog/genre/create", "name=")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.contains("Genre name required"));
}

#[tokio::test]
async fn detail_fails_when_only_the_book_query_fails() {
    let (_app, store) = test_app().await;
    let drama = seed_genre(&store, "Drama").await;

    let state = AppState {
        genres: Arc::new(store.clone()),
        books: Arc::new(BrokenStore),
        views: Arc::new(TemplateViews::new().expect("templates")),
        options: CatalogOptions::default(),
    };
    let app = build_router(state);

    let reply = send(&app, get(&drama.url())).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
}
