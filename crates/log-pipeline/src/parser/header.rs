//! 헤더 토크나이저 -- `L`/`RL` 마커와 타임스탬프 인식
//!
//! 라인 전체에 고정된 규칙 `^(RL|L) MM/DD/YYYY - HH:MM:SS: <본문>$`을 적용합니다.
//! 숫자 필드는 범위 검증 없이 정수로 옮깁니다. 매칭되지 않는 라인은
//! 로그 라인이 아니므로 호출자는 에러 없이 버립니다.

use std::sync::LazyLock;

use regex::Regex;

use hllog_core::types::{Origin, Timestamp};

use super::grammar::{REST, TIMESTAMP, TYPE};

// 상수 조각으로만 구성되므로 컴파일은 실패하지 않음
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{TYPE}{TIMESTAMP}{REST}$")).expect("header pattern is valid")
});

/// 인식된 헤더와 나머지 본문
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogHeader<'a> {
    /// `L` 또는 `RL`
    pub origin: Origin,
    /// 헤더 타임스탬프
    pub timestamp: Timestamp,
    /// 헤더 뒤의 본문 (프로퍼티 포함)
    pub remainder: &'a str,
}

/// 라인에서 헤더를 인식합니다.
///
/// 마커가 없거나, 타임스탬프 형식이 맞지 않거나, 본문이 비어 있으면 `None`.
pub fn parse_header(line: &str) -> Option<LogHeader<'_>> {
    let caps = HEADER_RE.captures(line)?;

    let origin = Origin::from_marker(caps.name("type")?.as_str())?;
    let field = |name: &str| caps.name(name).map(|m| m.as_str());

    let timestamp = Timestamp::new(
        field("year")?.parse().ok()?,
        field("month")?.parse().ok()?,
        field("day")?.parse().ok()?,
        field("hour")?.parse().ok()?,
        field("minute")?.parse().ok()?,
        field("second")?.parse().ok()?,
    );

    Some(LogHeader {
        origin,
        timestamp,
        remainder: caps.name("rest")?.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_header() {
        let header = parse_header("L 05/12/2021 - 03:04:05: foo").unwrap();
        assert_eq!(header.origin, Origin::Local);
        assert_eq!(header.timestamp, Timestamp::new(2021, 5, 12, 3, 4, 5));
        assert_eq!(header.remainder, "foo");
    }

    #[test]
    fn remote_header_has_same_remainder() {
        let local = parse_header("L 05/12/2021 - 03:04:05: foo").unwrap();
        let remote = parse_header("RL 05/12/2021 - 03:04:05: foo").unwrap();
        assert_eq!(remote.origin, Origin::Remote);
        assert_eq!(remote.timestamp, local.timestamp);
        assert_eq!(remote.remainder, local.remainder);
    }

    #[test]
    fn out_of_range_fields_are_kept() {
        let header = parse_header("L 13/32/2021 - 25:61:99: x").unwrap();
        assert_eq!(header.timestamp.month, 13);
        assert_eq!(header.timestamp.day, 32);
        assert_eq!(header.timestamp.second, 99);
    }

    #[test]
    fn remainder_keeps_properties_and_colons() {
        let header =
            parse_header(r#"L 01/01/2000 - 00:00:00: a: b (key "v")"#).unwrap();
        assert_eq!(header.remainder, r#"a: b (key "v")"#);
    }

    #[test]
    fn rejects_non_headers() {
        for line in [
            "garbage line",
            "",
            "L 05/12/2021 - 03:04:05: ",
            "L 05/12/2021 - 03:04:05:",
            "X 05/12/2021 - 03:04:05: foo",
            "L 5/12/2021 - 03:04:05: foo",
            "L 05/12/21 - 03:04:05: foo",
            "L 05-12-2021 - 03:04:05: foo",
            " L 05/12/2021 - 03:04:05: foo",
            "RLL 05/12/2021 - 03:04:05: foo",
        ] {
            assert!(parse_header(line).is_none(), "{line:?}");
        }
    }
}
