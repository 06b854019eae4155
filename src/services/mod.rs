//! # 서비스 모듈
//!
//! HTTP나 DB에 의존하지 않는 도메인 로직입니다.
//! - `validation`: 필드 검증기와 입력 정제(trim + HTML 이스케이프)
//! - `genre_form`: 장르 생성/수정 폼 파이프라인과 `Step` 결과 타입

pub mod genre_form;
pub mod validation;
