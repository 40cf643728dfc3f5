//! 값 구조 추론기
//!
//! 프로퍼티 값 전체에 구조 감지기를 순서대로 적용합니다.
//! 감지기 목록을 끝까지 돌고 마지막으로 매칭된 결과를 채택합니다.
//! 기본 감지기 두 개(위치, 플레이어)는 서로 겹치지 않으므로 첫 매칭과 결과가 같습니다.
//! 이 함수는 실패하지 않습니다. 어떤 감지기에도 맞지 않으면 원본 문자열만 남습니다.

use std::sync::LazyLock;

use regex::Regex;

use hllog_core::types::{PropertyValue, ValueShape};

use super::grammar::{POSITION, player_fragment};

static POSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{POSITION}$")).expect("position pattern is valid")
});

static PLAYER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", player_fragment(""))).expect("player pattern is valid")
});

/// 구조 감지기: 값 전체가 맞으면 구조를 반환
type Detector = fn(&str) -> Option<ValueShape>;

/// 적용 순서대로 나열한 감지기 (이름, 함수)
const DETECTORS: &[(&str, Detector)] = &[
    ("position", detect_position),
    ("player", detect_player),
];

/// 프로퍼티 값의 구조를 추론합니다.
///
/// `_key`는 키별 감지기를 위한 자리이며 기본 감지기는 사용하지 않습니다.
pub fn parse_value(_key: &str, value: &str) -> PropertyValue {
    let shape = DETECTORS
        .iter()
        .filter_map(|(_, detect)| detect(value))
        .last();

    match shape {
        Some(shape) => PropertyValue::with_shape(value, shape),
        None => PropertyValue::raw(value),
    }
}

/// `"x y z"` 정수 좌표.
///
/// 문법상 자릿수 제한은 없지만 좌표는 `i64`로 저장합니다. 한 성분이라도
/// `i64` 범위를 넘으면 위치로 분류하지 않고 원본 문자열로 남깁니다
/// (값 자체는 `raw` 필드에 그대로 보존됨).
pub fn detect_position(value: &str) -> Option<ValueShape> {
    let caps = POSITION_RE.captures(value)?;
    Some(ValueShape::Position {
        x: caps.name("x")?.as_str().parse().ok()?,
        y: caps.name("y")?.as_str().parse().ok()?,
        z: caps.name("z")?.as_str().parse().ok()?,
    })
}

/// `name<uid><steamid><team>` 플레이어 튜플
pub fn detect_player(value: &str) -> Option<ValueShape> {
    let caps = PLAYER_RE.captures(value)?;
    Some(ValueShape::Player {
        name: caps.name("name")?.as_str().to_owned(),
        uid: caps.name("uid")?.as_str().parse().ok()?,
        steamid: caps.name("steamid")?.as_str().to_owned(),
        team: caps.name("team")?.as_str().to_owned(),
    })
}
