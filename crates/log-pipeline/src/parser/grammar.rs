//! HL Log Standard 문법 조각
//!
//! 헤더, 프로퍼티, 값 구조, 이벤트 패턴이 공유하는 정규식 조각을 한 곳에 모읍니다.
//! 이벤트 패턴은 `{player}`, `{attacker}`, `{victim}`, `{string}`, `{position}`
//! 토큰을 사용할 수 있으며, [`expand_tokens`]가 등록 시점에 치환합니다.

/// 패킷 종류 마커 (`L` 또는 `RL`) 뒤에 공백 하나
pub const TYPE: &str = r"(?P<type>RL|L) ";

/// 고정 폭 타임스탬프 뒤에 `": "`
pub const TIMESTAMP: &str = r"(?P<month>[0-9]{2})/(?P<day>[0-9]{2})/(?P<year>[0-9]{4}) - (?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2}): ";

/// 나머지 본문 (비어 있지 않음)
pub const REST: &str = r"(?P<rest>.+)";

/// 라인 끝의 `(key "value")` 절 하나
pub const PROPERTY: &str = r#" \((?P<key>[^() "]+) "(?P<value>[^"]*)"\)"#;

/// 따옴표로 감싼 문자열
pub const STRING: &str = r#""(?P<string>[^"]*)""#;

/// 공백으로 구분된 부호 있는 정수 3개
pub const POSITION: &str = r"(?P<x>-?[0-9]+) (?P<y>-?[0-9]+) (?P<z>-?[0-9]+)";

/// 이벤트 패턴에서 치환 가능한 토큰 이름
pub const TOKENS: &[&str] = &["player", "attacker", "victim", "string", "position"];

/// 플레이어 튜플 `name<uid><steamid><team>`
///
/// `prefix`가 비어 있으면 캡처 이름은 `name`, `uid`, `steamid`, `team`이고,
/// 그렇지 않으면 `{prefix}_name` 형태가 됩니다.
pub fn player_fragment(prefix: &str) -> String {
    let p = if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}_")
    };
    format!(
        r#"(?P<{p}name>.*?)<(?P<{p}uid>[0-9]{{1,3}}?)><(?P<{p}steamid>Console|BOT|STEAM_[01]:[01]:[0-9]{{1,12}})><(?P<{p}team>[^<>"]*)>"#
    )
}

/// 토큰 이름에 해당하는 정규식 조각을 반환합니다.
pub fn token(name: &str) -> Option<String> {
    match name {
        "player" => Some(player_fragment("")),
        "attacker" => Some(player_fragment("attacker")),
        "victim" => Some(player_fragment("victim")),
        "string" => Some(STRING.to_owned()),
        "position" => Some(POSITION.to_owned()),
        _ => None,
    }
}

/// 이벤트 패턴의 `{token}`을 정규식 조각으로 치환합니다.
///
/// 알 수 없는 `{...}` (예: `[0-9]{3}` 반복 한정자)와 백슬래시로 이스케이프된
/// 중괄호는 그대로 둡니다. 같은 토큰을 두 번 쓰면 캡처 이름이 겹쳐
/// 컴파일 단계에서 거부됩니다.
pub fn expand_tokens(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(idx) = rest.find(['\\', '{']) {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        if tail.starts_with('\\') {
            // 이스케이프 시퀀스는 다음 문자까지 통째로 복사
            let len = tail[1..].chars().next().map_or(1, |c| 1 + c.len_utf8());
            out.push_str(&tail[..len]);
            rest = &tail[len..];
            continue;
        }

        let replaced = tail[1..]
            .find('}')
            .and_then(|end| token(&tail[1..=end]).map(|frag| (frag, end + 2)));

        match replaced {
            Some((frag, consumed)) => {
                out.push_str(&frag);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
