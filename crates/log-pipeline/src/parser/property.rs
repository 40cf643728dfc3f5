//! 프로퍼티 추출기
//!
//! 본문 끝에서 `(key "value")` 절을 하나씩 떼어냅니다. 규칙이 문자열 끝에
//! 고정되어 있으므로 오른쪽 절부터 제거되며, 첫 불일치에서 멈춥니다.
//! 형식이 깨진 절은 에러가 아니라 본문의 일부로 남습니다.

use std::sync::LazyLock;

use regex::Regex;

use hllog_core::types::PropertySet;

use super::grammar::PROPERTY;
use super::value::parse_value;

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?P<rest>.*){PROPERTY}$")).expect("property pattern is valid")
});

/// 본문에서 끝쪽 프로퍼티 절을 모두 추출합니다.
///
/// 반환값은 (추출된 프로퍼티, 절을 제거한 나머지 본문)입니다.
/// 같은 키가 여러 번 나오면 나중에 추출된 값(원래 왼쪽에 있던 값)이 남습니다.
pub fn extract_properties(remainder: &str) -> (PropertySet, &str) {
    let mut properties = PropertySet::new();
    let mut rest = remainder;

    while let Some(caps) = PROPERTY_RE.captures(rest) {
        let (Some(head), Some(key), Some(value)) =
            (caps.name("rest"), caps.name("key"), caps.name("value"))
        else {
            break;
        };

        let key = key.as_str();
        properties.insert(key, parse_value(key, value.as_str()));
        rest = head.as_str();
    }

    (properties, rest)
}
