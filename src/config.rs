//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `DATABASE_MAX_CONNECTIONS`: 연결 풀 최대 크기
//! - `UPDATE_REJECTS_DUPLICATE_NAMES`: 장르 수정 시 이름 중복 검사 여부
//! - `SEED_SAMPLE_DATA`: 시작 시 빈 카탈로그에 샘플 데이터 적재 여부

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 main에서만 사용합니다.
/// 핸들러에 필요한 부분은 `CatalogOptions`로 나눠 `AppState`에 넣습니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/catalog.db")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 연결 풀 최대 연결 수 (기본값: 5)
    pub max_connections: u32,
    /// 시작 시 빈 카탈로그에 샘플 장르/도서를 넣을지 여부 (기본값: false)
    pub seed_sample_data: bool,
    /// 카탈로그 핸들러 동작 옵션
    pub catalog: CatalogOptions,
}

/// 장르 핸들러의 동작을 바꾸는 옵션
///
/// 생성(create)은 항상 같은 이름의 장르를 찾아 중복 생성을 막습니다.
/// 수정(update)은 기본적으로 중복 검사를 하지 않으며, 이 옵션으로 켤 수 있습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogOptions {
    /// true면 다른 장르가 이미 쓰는 이름으로의 수정을 거부하고 폼을 다시 보여줍니다.
    pub update_rejects_duplicate_names: bool,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 `VarError`를 반환합니다.
    /// 나머지 설정은 기본값이 있고, 숫자 파싱에 실패해도 기본값을 사용합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            catalog: CatalogOptions {
                update_rejects_duplicate_names: env::var("UPDATE_REJECTS_DUPLICATE_NAMES")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
            },
        })
    }
}

/// "1", "true", "yes", "on"(대소문자 무시)을 참으로 해석합니다.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
