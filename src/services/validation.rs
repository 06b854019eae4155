//! # 폼 검증(Validation)과 정제(Sanitization)
//!
//! 검증과 정제는 서로 독립적입니다.
//! - 검증: `validator` 크레이트의 `#[derive(Validate)]` 규칙을 적용하고, 실패한 항목을 모두 모읍니다 (첫 실패에서 멈추지 않음).
//! - 정제: 검증 결과와 상관없이 입력을 trim하고 HTML 이스케이프합니다.
//!
//! 검증에 실패한 폼을 다시 보여줄 때도 정제된 값을 사용합니다.

use serde::Serialize;
use validator::ValidationErrors;

/// 필드 하나의 검증 실패
///
/// 템플릿에서는 `{{ error.message }}`로 출력합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// 폼 필드 이름 (예: "name")
    pub field: String,
    /// 사용자에게 보여줄 메시지
    pub message: String,
    /// 검증 당시의 원본 값 (필드가 없었으면 빈 문자열)
    pub value: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            value: value.to_string(),
        }
    }
}

/// `validate()` 결과를 필드 이름순의 `FieldError` 목록으로 펼칩니다.
///
/// `raw_value`는 필드 이름을 받아 사용자가 보낸 원본 값을 돌려줍니다.
/// 규칙에 `message`가 없으면 규칙 코드(예: "length")를 메시지로 씁니다.
pub fn collect_field_errors(
    result: Result<(), ValidationErrors>,
    raw_value: impl Fn(&str) -> String,
) -> Vec<FieldError> {
    let Err(errors) = result else {
        return Vec::new();
    };

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = Vec::new();
    for (field, failures) in fields {
        let value = raw_value(&*field);
        for failure in failures {
            let message = failure.message.as_deref().unwrap_or(&failure.code);
            out.push(FieldError::new(&*field, message, &value));
        }
    }
    out
}

/// 앞뒤의 공백과 BOM(U+FEFF)을 제거합니다.
///
/// `str::trim`은 U+FEFF를 공백으로 보지 않으므로 따로 지웁니다.
pub fn trim_input(input: &str) -> &str {
    input.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// 앞뒤 공백 제거 후 HTML 특수문자를 이스케이프합니다.
pub fn sanitize_text(input: &str) -> String {
    escape_html(trim_input(input))
}

/// HTML 본문과 속성 값에서 의미를 갖는 문자를 엔티티로 바꿉니다.
///
/// `&` `<` `>` `"` `'` 외에 `/` `\` `` ` ``도 바꿉니다.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(ch),
        }
    }
    out
}
