//! # 데이터 모델 모듈
//!
//! 카탈로그에서 사용하는 데이터 구조체들을 정의합니다.
//! - `genre`: 장르(Genre), 폼에서 만든 후보 장르, 폼 본문 구조체
//! - `book`: 도서(Book). 장르 핸들러 입장에서는 읽기 전용입니다.

pub mod book;
pub mod genre;

pub use book::*;
pub use genre::*;
