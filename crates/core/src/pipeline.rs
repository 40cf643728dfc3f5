//! 싱크 trait — 디코딩 결과가 나가는 두 개의 출구
//!
//! 코어가 외부로 내보내는 관측 가능한 출력은 두 가지뿐입니다.
//! 등록된 이벤트에 매칭된 엔트리와, 아무 이벤트에도 맞지 않은 unknown 엔트리.
//! 저장, 표시, 통계 등은 모두 이 trait 뒤에 있는 외부 관심사입니다.

use crate::types::{EventEntry, UnknownEntry};

/// 디코딩된 엔트리를 받는 싱크
///
/// 파서는 라인 하나를 끝까지 처리한 뒤 둘 중 정확히 하나를 호출하거나,
/// 헤더가 인식되지 않은 라인이면 아무것도 호출하지 않습니다.
pub trait EntrySink {
    /// 이벤트 레지스트리에 매칭된 엔트리
    fn on_event(&mut self, entry: &EventEntry);

    /// 매칭되는 이벤트가 없는 엔트리
    fn on_unknown(&mut self, entry: &UnknownEntry);
}

impl<S: EntrySink + ?Sized> EntrySink for &mut S {
    fn on_event(&mut self, entry: &EventEntry) {
        (**self).on_event(entry);
    }

    fn on_unknown(&mut self, entry: &UnknownEntry) {
        (**self).on_unknown(entry);
    }
}

impl<S: EntrySink + ?Sized> EntrySink for Box<S> {
    fn on_event(&mut self, entry: &EventEntry) {
        (**self).on_event(entry);
    }

    fn on_unknown(&mut self, entry: &UnknownEntry) {
        (**self).on_unknown(entry);
    }
}

/// 두 개의 클로저로 구성한 싱크
///
/// # 사용 예시
/// ```
/// use hllog_core::pipeline::{Callbacks, EntrySink};
/// use hllog_core::types::{EventEntry, UnknownEntry};
///
/// let mut events = 0;
/// let mut unknown = 0;
/// let mut sink = Callbacks::new(
///     |_e: &EventEntry| events += 1,
///     |_u: &UnknownEntry| unknown += 1,
/// );
/// # let _ = &mut sink;
/// ```
pub struct Callbacks<E, U> {
    on_event: E,
    on_unknown: U,
}

impl<E, U> Callbacks<E, U>
where
    E: FnMut(&EventEntry),
    U: FnMut(&UnknownEntry),
{
    /// 이벤트 콜백과 unknown 콜백으로 싱크를 생성합니다.
    pub fn new(on_event: E, on_unknown: U) -> Self {
        Self {
            on_event,
            on_unknown,
        }
    }
}

impl<E, U> EntrySink for Callbacks<E, U>
where
    E: FnMut(&EventEntry),
    U: FnMut(&UnknownEntry),
{
    fn on_event(&mut self, entry: &EventEntry) {
        (self.on_event)(entry);
    }

    fn on_unknown(&mut self, entry: &UnknownEntry) {
        (self.on_unknown)(entry);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::types::{Origin, PropertySet, Timestamp};

    fn event() -> EventEntry {
        EventEntry {
            origin: Origin::Remote,
            timestamp: Timestamp::new(2021, 5, 12, 3, 4, 5),
            event: "say".to_owned(),
            fields: BTreeMap::new(),
            properties: PropertySet::new(),
        }
    }

    fn unknown() -> UnknownEntry {
        UnknownEntry {
            origin: Origin::Local,
            timestamp: Timestamp::new(2021, 5, 12, 3, 4, 5),
            properties: PropertySet::new(),
            remainder: "foo".to_owned(),
        }
    }

    #[test]
    fn callbacks_route_to_matching_closure() {
        let mut names = Vec::new();
        let mut remainders = Vec::new();
        {
            let mut sink = Callbacks::new(
                |e: &EventEntry| names.push(e.event.clone()),
                |u: &UnknownEntry| remainders.push(u.remainder.clone()),
            );
            sink.on_event(&event());
            sink.on_unknown(&unknown());
            sink.on_unknown(&unknown());
        }
        assert_eq!(names, vec!["say"]);
        assert_eq!(remainders.len(), 2);
    }

    #[test]
    fn mutable_reference_forwards() {
        struct Counter(usize);
        impl EntrySink for Counter {
            fn on_event(&mut self, _: &EventEntry) {
                self.0 += 10;
            }
            fn on_unknown(&mut self, _: &UnknownEntry) {
                self.0 += 1;
            }
        }

        fn feed<S: EntrySink>(mut sink: S) {
            sink.on_event(&event());
            sink.on_unknown(&unknown());
        }

        let mut counter = Counter(0);
        feed(&mut counter);
        feed(Box::new(&mut counter));
        assert_eq!(counter.0, 22);
    }
}
