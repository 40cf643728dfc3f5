//! 라인 파서 -- 헤더, 프로퍼티, 이벤트 분류를 거쳐 싱크로 전달
//!
//! 라인 하나의 처리 순서:
//! 1. 앞뒤 패딩 제거 (NUL, CR, LF, 탭, 공백, 바이트 입력에서는 `0xFF`도)
//! 2. 헤더 인식 ([`header`]) -- 실패하면 조용히 버림
//! 3. 끝쪽 프로퍼티 추출 ([`property`], 값 구조는 [`value`])
//! 4. 이벤트 레지스트리 매칭 -- 실패하면 unknown 엔트리
//!
//! 어떤 단계도 에러를 만들지 않습니다. 파서는 라인 사이에 상태를 갖지 않으므로
//! 같은 인스턴스를 파일 모드와 UDP 모드에서 번갈아 써도 됩니다.
//!
//! # 사용 예시
//! ```
//! use hllog_core::pipeline::Callbacks;
//! use hllog_core::types::{EventEntry, UnknownEntry};
//! use hllog_pipeline::parser::LogLineParser;
//! use hllog_pipeline::registry::EventRegistry;
//!
//! let registry = EventRegistry::new().with_event("say", r#""{player}" say {string}"#)?;
//! let mut said = Vec::new();
//! let mut parser = LogLineParser::new(
//!     registry,
//!     Callbacks::new(
//!         |e: &EventEntry| said.push(e.fields["string"].clone()),
//!         |_u: &UnknownEntry| {},
//!     ),
//! );
//!
//! assert!(parser.parse(r#"L 05/12/2021 - 03:04:05: "Bob<3><BOT><Red>" say "hi""#));
//! assert!(!parser.parse("garbage line"));
//! drop(parser);
//! assert_eq!(said, vec!["hi"]);
//! # Ok::<(), hllog_pipeline::LogPipelineError>(())
//! ```

pub mod grammar;
pub mod header;
pub mod property;
pub mod value;

pub use header::{LogHeader, parse_header};
pub use property::extract_properties;
pub use value::parse_value;

use std::path::Path;

use tracing::{info, trace};

use hllog_core::metrics as m;
use hllog_core::pipeline::EntrySink;
use hllog_core::types::{
    DecodedEntry, EventEntry, Origin, PropertySet, Timestamp, UnknownEntry,
};

use crate::collector::LineSource;
use crate::error::LogPipelineError;
use crate::registry::EventRegistry;

/// 라인 앞뒤에서 제거하는 패딩 문자
///
/// `0xFF`는 바이트 단계에서만 제거합니다. 문자 U+00FF(`ÿ`)는 본문의 일부입니다.
const PADDING: &[char] = &['\0', '\r', '\n', '\t', ' '];

/// 바이트 입력에서 제거하는 패딩 바이트
const PADDING_BYTES: &[u8] = &[0x00, 0xFF, b'\r', b'\n', b'\t', b' '];

/// 문자열 앞뒤 패딩을 제거합니다.
pub fn strip_padding(line: &str) -> &str {
    line.trim_matches(PADDING)
}

/// 바이트열 앞뒤 패딩을 제거합니다. UTF-8 변환 전에 적용합니다.
pub fn strip_padding_bytes(raw: &[u8]) -> &[u8] {
    let start = raw
        .iter()
        .position(|b| !PADDING_BYTES.contains(b))
        .unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|b| !PADDING_BYTES.contains(b))
        .map_or(start, |i| i + 1);
    &raw[start..end]
}

/// 헤더와 프로퍼티가 분리된 본문을 레지스트리로 분류합니다.
pub fn dispatch(
    registry: &EventRegistry,
    origin: Origin,
    timestamp: Timestamp,
    remainder: &str,
    properties: PropertySet,
) -> DecodedEntry {
    match registry.match_line(remainder) {
        Some(hit) => DecodedEntry::Event(EventEntry {
            origin,
            timestamp,
            event: hit.name.to_owned(),
            fields: hit.fields,
            properties,
        }),
        None => DecodedEntry::Unknown(UnknownEntry {
            origin,
            timestamp,
            properties,
            remainder: remainder.to_owned(),
        }),
    }
}

/// 라인 하나를 디코딩합니다. 로그 라인이 아니면 `None`.
pub fn decode_line(registry: &EventRegistry, line: &str) -> Option<DecodedEntry> {
    decode_trimmed(registry, strip_padding(line))
}

/// 패딩이 이미 제거된 라인을 디코딩합니다.
fn decode_trimmed(registry: &EventRegistry, line: &str) -> Option<DecodedEntry> {
    let header = parse_header(line)?;
    let (properties, remainder) = extract_properties(header.remainder);
    Some(dispatch(
        registry,
        header.origin,
        header.timestamp,
        remainder,
        properties,
    ))
}

/// 디코딩 결과를 싱크의 알맞은 출구로 보냅니다.
fn deliver<S: EntrySink>(sink: &mut S, entry: &DecodedEntry) {
    match entry {
        DecodedEntry::Event(event) => sink.on_event(event),
        DecodedEntry::Unknown(unknown) => sink.on_unknown(unknown),
    }
}

/// 파일 읽기 결과 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// 읽은 라인 수
    pub lines: u64,
    /// 싱크로 전달된 엔트리 수
    pub emitted: u64,
}

impl ReadSummary {
    /// 헤더가 인식되지 않아 버려진 라인 수
    pub fn discarded(&self) -> u64 {
        self.lines - self.emitted
    }
}

/// 레지스트리와 싱크를 소유하는 라인 파서
pub struct LogLineParser<S> {
    registry: EventRegistry,
    sink: S,
}

impl<S: EntrySink> LogLineParser<S> {
    /// 새 파서를 생성합니다.
    pub fn new(registry: EventRegistry, sink: S) -> Self {
        Self { registry, sink }
    }

    /// 라인을 디코딩만 하고 싱크에는 전달하지 않습니다.
    pub fn decode(&self, line: &str) -> Option<DecodedEntry> {
        decode_line(&self.registry, line)
    }

    /// 라인을 디코딩하여 싱크로 전달합니다.
    ///
    /// 이벤트 또는 unknown 콜백이 정확히 한 번 호출되었으면 `true`,
    /// 로그 라인이 아니어서 버려졌으면 `false`.
    pub fn parse(&mut self, line: &str) -> bool {
        self.process(strip_padding(line))
    }

    /// 원시 바이트를 파싱합니다.
    ///
    /// 패딩 바이트를 먼저 제거한 뒤 손실 허용 UTF-8 변환을 거칩니다.
    /// UDP 페이로드(`FF FF FF FF` 마커와 `\n\0` 트레일러 포함)를 그대로 넘겨도 됩니다.
    pub fn parse_bytes(&mut self, raw: &[u8]) -> bool {
        let line = String::from_utf8_lossy(strip_padding_bytes(raw));
        self.process(&line)
    }

    fn process(&mut self, line: &str) -> bool {
        metrics::counter!(m::PARSER_LINES_TOTAL).increment(1);

        let Some(entry) = decode_trimmed(&self.registry, line) else {
            metrics::counter!(m::PARSER_LINES_DISCARDED_TOTAL).increment(1);
            trace!(len = line.len(), "discarded non-log line");
            return false;
        };

        match entry.event_name() {
            Some(name) => {
                metrics::counter!(m::PARSER_EVENTS_MATCHED_TOTAL, m::LABEL_EVENT => name.to_owned())
                    .increment(1);
            }
            None => metrics::counter!(m::PARSER_EVENTS_UNKNOWN_TOTAL).increment(1),
        }

        deliver(&mut self.sink, &entry);
        true
    }

    /// 파일의 모든 라인을 순서대로 파싱합니다.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ReadSummary, LogPipelineError> {
        let path = path.as_ref();
        let mut summary = ReadSummary::default();

        for line in LineSource::open(path)? {
            let line = line?;
            summary.lines += 1;
            if self.parse_bytes(&line) {
                summary.emitted += 1;
            }
        }

        info!(
            path = %path.display(),
            lines = summary.lines,
            emitted = summary.emitted,
            "finished reading log file"
        );

        Ok(summary)
    }

    /// 이벤트 레지스트리를 반환합니다.
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// 싱크를 반환합니다.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// 싱크를 가변으로 반환합니다.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// 파서를 해체하고 싱크를 돌려받습니다.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
