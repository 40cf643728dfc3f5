//! 도메인 타입 — 디코딩된 로그 라인을 표현하는 공통 타입
//!
//! 파서, 전송 계층, 싱크가 모두 이 타입들을 주고받습니다.
//! 모든 출력 타입은 `Serialize`를 구현하여 JSON 라인 등으로 바로 내보낼 수 있습니다.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// 로그 라인 출처
///
/// 라인이 `"RL "`로 시작하면 원격 로그(UDP 스트림), `"L "`이면 로컬 로그 파일입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// `L` 마커
    Local,
    /// `RL` 마커
    Remote,
}

impl Origin {
    /// 헤더 마커 문자열에서 출처를 판별합니다.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "L" => Some(Self::Local),
            "RL" => Some(Self::Remote),
            _ => None,
        }
    }

    /// 헤더에 쓰이는 마커 문자열을 반환합니다.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Local => "L",
            Self::Remote => "RL",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// 로그 헤더 타임스탬프
///
/// 고정 폭 10진수 필드를 그대로 정수로 옮긴 값입니다. 타임존이 없고
/// 달력 검증도 하지 않으므로 `13/32/2021` 같은 값도 그대로 보존됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// 연도 (4자리)
    pub year: u16,
    /// 월 (2자리)
    pub month: u8,
    /// 일 (2자리)
    pub day: u8,
    /// 시 (2자리)
    pub hour: u8,
    /// 분 (2자리)
    pub minute: u8,
    /// 초 (2자리)
    pub second: u8,
}

impl Timestamp {
    /// 새 타임스탬프를 생성합니다. 범위 검증은 하지 않습니다.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// 달력상 유효한 경우에만 `NaiveDateTime`으로 변환합니다.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?
        .and_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04} - {:02}:{:02}:{:02}",
            self.month, self.day, self.year, self.hour, self.minute, self.second,
        )
    }
}

/// 프로퍼티 값에서 감지된 구조
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueShape {
    /// 공백으로 구분된 정수 3개 (`"-12 340 5"`)
    Position { x: i64, y: i64, z: i64 },
    /// 플레이어 식별 튜플 (`name<uid><steamid><team>`)
    Player {
        name: String,
        uid: u16,
        steamid: String,
        team: String,
    },
}

/// 프로퍼티 값 -- 원본 문자열과 감지된 구조(있을 경우)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// 따옴표 안의 원본 문자열
    pub raw: String,
    /// 감지된 구조. 어떤 감지기에도 맞지 않으면 `None`
    pub shape: Option<ValueShape>,
}

impl PropertyValue {
    /// 구조 없는 원본 값을 생성합니다.
    pub fn raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            shape: None,
        }
    }

    /// 구조가 감지된 값을 생성합니다.
    pub fn with_shape(raw: impl Into<String>, shape: ValueShape) -> Self {
        Self {
            raw: raw.into(),
            shape: Some(shape),
        }
    }

    /// 원본 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 프로퍼티 집합
///
/// 라인 끝에서부터 `(key "value")` 절을 하나씩 떼어낸 순서(오른쪽에서 왼쪽)를
/// 그대로 유지합니다. 같은 키가 다시 들어오면 기존 위치의 값을 덮어씁니다.
/// 이 순서는 구현 세부사항이며 외부 계약이 아닙니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertySet {
    /// 빈 집합을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 값을 기록합니다. 같은 키가 있으면 덮어쓰고 이전 값을 반환합니다.
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// 키에 해당하는 값을 반환합니다.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// 키에 해당하는 원본 문자열을 반환합니다.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.get(key).map(PropertyValue::as_str)
    }

    /// 프로퍼티 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 추출 순서대로 (키, 값)을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 추출 순서대로 키를 순회합니다.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for PropertySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// 이벤트 레지스트리에 매칭된 엔트리
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventEntry {
    /// 라인 출처
    pub origin: Origin,
    /// 헤더 타임스탬프
    pub timestamp: Timestamp,
    /// 매칭된 이벤트 이름
    pub event: String,
    /// 이벤트 패턴의 이름 있는 캡처 (매칭에 참여한 그룹만)
    pub fields: BTreeMap<String, String>,
    /// 라인 끝에서 추출된 프로퍼티
    pub properties: PropertySet,
}

/// 어떤 이벤트에도 매칭되지 않은 엔트리
///
/// 내용 손실이 없도록 프로퍼티 추출 후의 본문을 그대로 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownEntry {
    /// 라인 출처
    pub origin: Origin,
    /// 헤더 타임스탬프
    pub timestamp: Timestamp,
    /// 라인 끝에서 추출된 프로퍼티
    pub properties: PropertySet,
    /// 프로퍼티 절을 제거한 나머지 본문
    pub remainder: String,
}

/// 디코딩 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecodedEntry {
    /// 등록된 이벤트에 매칭됨
    Event(EventEntry),
    /// 매칭되는 이벤트 없음
    Unknown(UnknownEntry),
}

impl DecodedEntry {
    /// 라인 출처를 반환합니다.
    pub fn origin(&self) -> Origin {
        match self {
            Self::Event(e) => e.origin,
            Self::Unknown(u) => u.origin,
        }
    }

    /// 타임스탬프를 반환합니다.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Event(e) => e.timestamp,
            Self::Unknown(u) => u.timestamp,
        }
    }

    /// 프로퍼티 집합을 반환합니다.
    pub fn properties(&self) -> &PropertySet {
        match self {
            Self::Event(e) => &e.properties,
            Self::Unknown(u) => &u.properties,
        }
    }

    /// 매칭된 이벤트 이름을 반환합니다. unknown이면 `None`.
    pub fn event_name(&self) -> Option<&str> {
        match self {
            Self::Event(e) => Some(&e.event),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for DecodedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(e) => write!(f, "{} {}: {}", e.origin, e.timestamp, e.event),
            Self::Unknown(u) => write!(f, "{} {}: ? {}", u.origin, u.timestamp, u.remainder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_markers() {
        assert_eq!(Origin::from_marker("L"), Some(Origin::Local));
        assert_eq!(Origin::from_marker("RL"), Some(Origin::Remote));
        assert_eq!(Origin::from_marker("R"), None);
        assert_eq!(Origin::Remote.to_string(), "RL");
    }

    #[test]
    fn timestamp_display_uses_wire_layout() {
        let ts = Timestamp::new(2021, 5, 12, 3, 4, 5);
        assert_eq!(ts.to_string(), "05/12/2021 - 03:04:05");
    }

    #[test]
    fn timestamp_calendar_conversion() {
        let ts = Timestamp::new(2021, 5, 12, 3, 4, 5);
        let dt = ts.to_naive_datetime().unwrap();
        assert_eq!(dt.to_string(), "2021-05-12 03:04:05");

        // 잘못된 날짜도 값 자체는 유지되지만 변환은 실패
        let bogus = Timestamp::new(2021, 2, 32, 25, 0, 0);
        assert_eq!(bogus.day, 32);
        assert!(bogus.to_naive_datetime().is_none());
    }

    #[test]
    fn property_set_last_write_wins_in_place() {
        let mut props = PropertySet::new();
        assert!(props.insert("damage", PropertyValue::raw("42")).is_none());
        props.insert("weapon", PropertyValue::raw("rifle"));
        let old = props.insert("damage", PropertyValue::raw("7"));

        assert_eq!(old.map(|v| v.raw), Some("42".to_owned()));
        assert_eq!(props.len(), 2);
        assert_eq!(props.raw("damage"), Some("7"));
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["damage", "weapon"]);
    }

    #[test]
    fn property_set_serializes_as_object() {
        let mut props = PropertySet::new();
        props.insert(
            "position",
            PropertyValue::with_shape("1 2 3", ValueShape::Position { x: 1, y: 2, z: 3 }),
        );
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["position"]["raw"], "1 2 3");
        assert_eq!(json["position"]["shape"]["type"], "position");
        assert_eq!(json["position"]["shape"]["z"], 3);
    }

    #[test]
    fn decoded_entry_accessors_and_tag() {
        let entry = DecodedEntry::Unknown(UnknownEntry {
            origin: Origin::Local,
            timestamp: Timestamp::new(2000, 1, 1, 0, 0, 0),
            properties: PropertySet::new(),
            remainder: "test".to_owned(),
        });
        assert_eq!(entry.origin(), Origin::Local);
        assert!(entry.event_name().is_none());
        assert!(entry.properties().is_empty());

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "unknown");
        assert_eq!(json["remainder"], "test");
        assert_eq!(json["origin"], "local");
    }
}
