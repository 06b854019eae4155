//! # HTML 폼 추출기
//!
//! `axum::Form`과 같지만, 본문을 읽지 못했을 때의 거부(rejection)를
//! `AppError`로 바꿔 다른 에러와 같은 HTML 에러 페이지를 보여줍니다.
//! 필수 필드 누락, 같은 필드 반복, 잘못된 Content-Type 등이 여기에 해당합니다.

use crate::error::AppError;
use axum::{
    extract::{FromRequest, Request},
    Form,
};
use serde::de::DeserializeOwned;

/// urlencoded 폼 본문 추출기. 실패하면 `AppError::BadForm`.
#[derive(Debug, Clone)]
pub struct HtmlForm<T>(pub T);

impl<T, S> FromRequest<S> for HtmlForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
