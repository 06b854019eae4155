//! # 장르 모델 정의
//!
//! ## 구조체 역할
//! - `Genre`: DB의 `genres` 테이블 한 행. 템플릿에 넘길 때 `url`이 함께 직렬화됩니다.
//! - `GenreCandidate`: 폼 입력을 정제(sanitize)해서 만든 저장 전의 장르
//! - `GenreForm`: 생성/수정 폼의 본문 (`application/x-www-form-urlencoded`)
//! - `DeleteGenreForm`: 삭제 확인 폼의 본문

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

/// 장르 목록 페이지 경로. 삭제 후 리다이렉트 대상이기도 합니다.
pub const GENRE_LIST_URL: &str = "/catalog/genres";

/// 장르 상세 페이지 경로를 만듭니다. 예: `/catalog/genre/0190...`
pub fn genre_url(id: &str) -> String {
    format!("/catalog/genre/{id}")
}

/// 장르 엔티티 — DB의 `genres` 테이블 한 행(row)에 대응합니다.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Genre {
    /// 저장소가 부여한 고유 식별자 (UUIDv7 문자열)
    pub id: String,
    /// 장르 이름. 저장 전에 trim + HTML 이스케이프된 값입니다.
    pub name: String,
}

impl Genre {
    /// 이 장르의 상세 페이지 경로 (파생 속성)
    pub fn url(&self) -> String {
        genre_url(&self.id)
    }
}

// derive(Serialize) 대신 직접 구현하는 이유는 파생 속성 `url`을 같이 내보내기 위해서입니다.
// 템플릿에서는 `{{ genre.url }}`로 바로 링크를 만들 수 있습니다.
impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Genre", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("url", &self.url())?;
        state.end()
    }
}

/// 폼 입력으로 만든 저장 전 장르
///
/// 생성 시에는 `id`가 None이고, 수정 시에는 대상 장르의 ID를 담습니다.
/// 검증에 실패해도 폼을 다시 채우기 위해 이 값을 그대로 템플릿에 넘깁니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCandidate {
    pub id: Option<String>,
    pub name: String,
}

/// 장르 생성/수정 폼 본문
///
/// 필드가 빠진 요청도 역직렬화에 성공해야 검증 단계에서
/// "Genre name required" 메시지를 보여줄 수 있으므로 모두 Option입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreForm {
    pub name: Option<String>,
    /// 수정 폼의 hidden 필드. 생성 폼에서는 무시됩니다.
    pub id: Option<String>,
}

/// 장르 삭제 폼 본문. 삭제 대상 ID는 경로가 아니라 본문에서 가져옵니다.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteGenreForm {
    pub genreid: String,
}
