//! # 에러 처리 모듈
//!
//! 카탈로그 애플리케이션에서 발생할 수 있는 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 핸들러가 중앙 에러 처리기로 넘기는 모든 실패를 통합
//! - `IntoResponse` 구현: 에러를 HTML 에러 페이지로 변환 (중앙 에러 처리기 역할)
//!
//! 폼 검증 실패와 "도서가 남아 있어 삭제 불가"는 에러가 아닙니다.
//! 두 경우 모두 원래 폼을 다시 렌더링하며, `services::genre_form::Step`이 다룹니다.

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// 중앙 에러 처리기로 전달되는 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 `IntoResponse`를 호출하여 에러 페이지를 만듭니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 식별자로 찾은 리소스가 없음 (HTTP 404)
    /// 필드 값은 리소스 이름입니다. 예: `NotFound("Genre")` → "Genre not found"
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 폼 본문을 읽거나 해석하지 못함 (거부 사유에 따라 400/415/422 등)
    #[error("Invalid form submission: {0}")]
    BadForm(#[from] FormRejection),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from] 덕분에 sqlx 호출 뒤의 `?`가 자동으로 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 마이그레이션 실행 실패 (HTTP 500, 주로 시작 단계에서 발생)
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// 파일 입출력 오류 (HTTP 500). DB 파일 디렉토리 생성 등에서 발생합니다.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 템플릿 로딩/렌더링 오류 (HTTP 500)
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 이 에러에 대응하는 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadForm(rejection) => rejection.status(),
            AppError::Database(_)
            | AppError::Migrate(_)
            | AppError::Io(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTML 에러 페이지로 변환합니다.
    ///
    /// 폼 거부 사유는 사용자 입력을 담을 수 있어 로그에만 남깁니다.
    /// 내부 에러(Database, Migrate, Io, Template, Internal)는 실제 내용을 로그에만 남기고,
    /// 사용자에게는 일반적인 메시지만 보여줍니다.
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound(_) => self.to_string(),
            AppError::BadForm(ref rejection) => {
                tracing::debug!("Rejected form: {}", rejection.body_text());
                "The submitted form could not be read".to_string()
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::Migrate(ref e) => {
                tracing::error!("Migration error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                "An IO error occurred".to_string()
            }
            AppError::Template(ref e) => {
                tracing::error!("Template error: {:#}", e);
                "The page could not be rendered".to_string()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        };

        // 에러 페이지는 템플릿 엔진을 거치지 않습니다.
        // 렌더링 자체가 실패한 경우에도 응답을 만들 수 있어야 하기 때문입니다.
        // message는 위에서 만든 고정 문구뿐이라 별도 이스케이프가 필요 없습니다.
        let code = status.as_u16();
        let body = Html(format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>Error</title></head>\n\
             <body>\n<h1>{message}</h1>\n<h2>{code}</h2>\n\
             <p><a href=\"/catalog/genres\">Back to genres</a></p>\n</body>\n</html>\n"
        ));

        (status, body).into_response()
    }
}
