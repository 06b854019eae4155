//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과, 핸들러가 공유하는 `AppState`를 정의합니다.
//!
//! 각 하위 모듈:
//! - `form`: HTML 에러 페이지로 거부하는 폼 추출기
//! - `genres`: 장르 목록/상세/생성/수정/삭제 화면
//! - `health`: 서버와 저장소 상태 확인 (헬스체크)

pub mod form;
pub mod genres;
pub mod health;

pub use form::HtmlForm;
pub use genres::*;
pub use health::*;

use crate::{
    config::CatalogOptions,
    db::{BookStore, GenreStore},
    views::ViewRenderer,
};
use std::sync::Arc;

/// 모든 핸들러가 공유하는 애플리케이션 상태
///
/// 저장소와 렌더러는 트레이트 객체로 주입됩니다.
/// `Arc`라서 요청마다 clone해도 참조 카운트만 늘어납니다.
#[derive(Clone)]
pub struct AppState {
    pub genres: Arc<dyn GenreStore>,
    pub books: Arc<dyn BookStore>,
    pub views: Arc<dyn ViewRenderer>,
    pub options: CatalogOptions,
}

impl AppState {
    /// 장르와 도서를 같은 저장소 하나가 모두 담당할 때 쓰는 생성자
    pub fn new<S, V>(store: S, views: V, options: CatalogOptions) -> Self
    where
        S: GenreStore + BookStore + Clone + 'static,
        V: ViewRenderer + 'static,
    {
        Self {
            genres: Arc::new(store.clone()),
            books: Arc::new(store),
            views: Arc::new(views),
            options,
        }
    }
}
