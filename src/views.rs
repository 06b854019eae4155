//! # 뷰 렌더링 모듈
//!
//! 핸들러는 `ViewRenderer` 트레이트에 뷰 이름과 컨텍스트만 넘깁니다.
//! 기본 구현인 `TemplateViews`는 minijinja 환경에 `templates/`의 파일들을
//! 컴파일 타임에 포함(`include_str!`)해서 등록합니다.
//!
//! 뷰 이름은 확장자 없이 씁니다. 예: `"genre_list"` → `genre_list.html`
//! `.html` 템플릿은 minijinja가 자동으로 HTML 이스케이프합니다.

use crate::error::AppError;
use minijinja::Environment;
use serde_json::Value;

/// 이름이 붙은 템플릿을 데이터 컨텍스트로 렌더링합니다.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, context: Value) -> Result<String, AppError>;
}

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("genre_list.html", include_str!("../templates/genre_list.html")),
    ("genre_detail.html", include_str!("../templates/genre_detail.html")),
    ("genre_form.html", include_str!("../templates/genre_form.html")),
    ("genre_delete.html", include_str!("../templates/genre_delete.html")),
];

/// minijinja 기반 뷰 렌더러
pub struct TemplateViews {
    env: Environment<'static>,
}

impl TemplateViews {
    /// 내장 템플릿을 모두 등록합니다. 문법 오류가 있으면 여기서 실패합니다.
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }
}

impl ViewRenderer for TemplateViews {
    fn render(&self, view: &str, context: Value) -> Result<String, AppError> {
        let template = self.env.get_template(&format!("{view}.html"))?;
        Ok(template.render(context)?)
    }
}
