//! # 장르 폼 처리 파이프라인
//!
//! 생성/수정 제출은 정해진 순서의 단계를 거칩니다.
//!
//! ```text
//! validate → sanitize → construct → (저장소 단계: 핸들러 쪽)
//! ```
//!
//! 각 단계는 `Step<T>`를 반환합니다. `Continue(T)`면 다음 단계로 값을 넘기고,
//! 나머지 variant는 응답이 결정된 상태라 이후 단계를 건너뜁니다.
//! 최종 결정은 `Step<Infallible>`이 되며 `respond()`로 HTTP 응답이 됩니다.

use crate::{
    error::AppError,
    models::{GenreCandidate, GenreForm},
    services::validation::{collect_field_errors, sanitize_text, trim_input, FieldError},
    views::ViewRenderer,
};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::json;
use std::convert::Infallible;
use validator::Validate;

/// 이름 필드 검증 실패 메시지. `NameInput`의 규칙 메시지와 같아야 합니다.
pub const NAME_REQUIRED: &str = "Genre name required";

/// 검증 규칙을 적용할 입력. 이름은 trim한 값입니다.
#[derive(Debug, Validate)]
struct NameInput {
    #[validate(length(min = 1, message = "Genre name required"))]
    name: String,
}

/// 파이프라인 한 단계의 결과
#[derive(Debug)]
pub enum Step<T> {
    /// 다음 단계로 진행
    Continue(T),
    /// 폼을 후보 값과 에러 목록으로 다시 렌더링 (HTTP 200)
    RenderWithErrors {
        candidate: GenreCandidate,
        errors: Vec<FieldError>,
    },
    /// 주어진 경로로 리다이렉트 (303 See Other)
    Redirect(String),
    /// 중앙 에러 처리기로 전달
    Fail(AppError),
}

impl<T> Step<T> {
    /// `Continue`일 때만 다음 단계를 실행합니다.
    pub fn and_then<U>(self, next: impl FnOnce(T) -> Step<U>) -> Step<U> {
        match self {
            Step::Continue(value) => next(value),
            Step::RenderWithErrors { candidate, errors } => {
                Step::RenderWithErrors { candidate, errors }
            }
            Step::Redirect(url) => Step::Redirect(url),
            Step::Fail(err) => Step::Fail(err),
        }
    }

    /// 진행할 값이 있으면 `Ok`, 이미 응답이 결정됐으면 그 결정을 `Err`로 돌려줍니다.
    ///
    /// 비동기 저장소 단계는 클로저로 넘기기 번거로워서 핸들러가 이걸로 분기합니다.
    pub fn into_continue(self) -> Result<T, Step<Infallible>> {
        match self {
            Step::Continue(value) => Ok(value),
            Step::RenderWithErrors { candidate, errors } => {
                Err(Step::RenderWithErrors { candidate, errors })
            }
            Step::Redirect(url) => Err(Step::Redirect(url)),
            Step::Fail(err) => Err(Step::Fail(err)),
        }
    }
}

impl Step<Infallible> {
    /// 최종 결정을 HTTP 응답으로 바꿉니다.
    ///
    /// `form_title`은 폼을 다시 렌더링할 때 쓰는 제목입니다.
    pub fn respond(self, views: &dyn ViewRenderer, form_title: &str) -> Response {
        match self {
            Step::Continue(never) => match never {},
            Step::RenderWithErrors { candidate, errors } => {
                let context = json!({
                    "title": form_title,
                    "genre": candidate,
                    "errors": errors,
                });
                match views.render("genre_form", context) {
                    Ok(html) => Html(html).into_response(),
                    Err(err) => err.into_response(),
                }
            }
            Step::Redirect(url) => Redirect::to(&url).into_response(),
            Step::Fail(err) => err.into_response(),
        }
    }
}

/// 검증 단계를 통과한 폼. 에러가 있어도 다음 단계로 넘어갑니다.
#[derive(Debug)]
pub struct Submission {
    pub name: String,
    pub errors: Vec<FieldError>,
}

/// 1단계: 필드 조건을 검사하고 실패를 모두 모읍니다.
pub fn validate(form: &GenreForm) -> Step<Vec<FieldError>> {
    let raw = form.name.as_deref().unwrap_or_default();
    let input = NameInput {
        name: trim_input(raw).to_string(),
    };
    Step::Continue(collect_field_errors(input.validate(), |_| raw.to_string()))
}

/// 2단계: 이름을 trim + HTML 이스케이프합니다. 검증 결과와 무관하게 항상 실행됩니다.
pub fn sanitize(form: &GenreForm, errors: Vec<FieldError>) -> Step<Submission> {
    let name = sanitize_text(form.name.as_deref().unwrap_or_default());
    Step::Continue(Submission { name, errors })
}

/// 3단계: 정제된 값으로 후보 장르를 만들고, 검증 실패가 있었다면 폼 재렌더링으로 멈춥니다.
pub fn construct(submission: Submission, target_id: Option<String>) -> Step<GenreCandidate> {
    let candidate = GenreCandidate {
        id: target_id,
        name: submission.name,
    };

    if submission.errors.is_empty() {
        Step::Continue(candidate)
    } else {
        Step::RenderWithErrors {
            candidate,
            errors: submission.errors,
        }
    }
}

/// 검증 → 정제 → 후보 생성을 순서대로 실행합니다.
///
/// `target_id`는 수정할 장르의 ID이며, 생성일 때는 None입니다.
pub fn process_genre_form(form: GenreForm, target_id: Option<String>) -> Step<GenreCandidate> {
    validate(&form)
        .and_then(|errors| sanitize(&form, errors))
        .and_then(|submission| construct(submission, target_id))
}
