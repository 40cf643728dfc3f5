//! 이벤트 레지스트리 -- 순서 있는 (이름, 패턴) 목록
//!
//! 헤더와 프로퍼티를 제거한 본문을 등록 순서대로 각 패턴에 맞춰 보고,
//! 처음 매칭된 이벤트를 반환합니다. 순서 외의 모호성 해소는 없습니다.
//!
//! 패턴은 등록 시점에 토큰 치환, 양끝 고정(`^(?:…)$`), 컴파일을 거칩니다.
//! 레지스트리는 파서로 이동(move)되므로 파싱 도중 바뀌지 않습니다.
//!
//! # 사용 예시
//! ```
//! use hllog_pipeline::registry::EventRegistry;
//!
//! let registry = EventRegistry::new()
//!     .with_event("say", r#"{player} say {string}"#)?
//!     .with_event("map_loading", r#"Loading map {string}"#)?;
//!
//! let hit = registry.match_line(r#"Loading map "cp_badlands""#).unwrap();
//! assert_eq!(hit.name, "map_loading");
//! assert_eq!(hit.fields["string"], "cp_badlands");
//! # Ok::<(), hllog_pipeline::LogPipelineError>(())
//! ```

pub mod loader;

pub use loader::EventLoader;

use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, info};

use hllog_core::config::{EventDefinition, EventsConfig};

use crate::error::LogPipelineError;
use crate::parser::grammar::expand_tokens;

/// 컴파일된 이벤트 하나
struct CompiledEvent {
    /// 이벤트 이름
    name: String,
    /// 등록 시 받은 원본 패턴
    pattern: String,
    /// 치환 + 고정 + 컴파일된 정규식
    regex: Regex,
}

/// 이벤트 매칭 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMatch<'r> {
    /// 매칭된 이벤트 이름
    pub name: &'r str,
    /// 매칭에 참여한 이름 있는 캡처
    pub fields: BTreeMap<String, String>,
}

/// 순서 있는 이벤트 레지스트리
#[derive(Default)]
pub struct EventRegistry {
    events: Vec<CompiledEvent>,
}

impl EventRegistry {
    /// 빈 레지스트리를 생성합니다. 모든 라인이 unknown으로 분류됩니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 이벤트를 레지스트리 끝에 등록합니다.
    ///
    /// # Errors
    /// - 같은 이름이 이미 있는 경우 [`LogPipelineError::DuplicateEvent`]
    /// - 이름이 비었거나 패턴이 컴파일되지 않는 경우 [`LogPipelineError::EventPattern`]
    pub fn register(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
    ) -> Result<&mut Self, LogPipelineError> {
        let name = name.into();

        if name.is_empty() {
            return Err(LogPipelineError::EventPattern {
                name,
                reason: "event name must not be empty".to_owned(),
            });
        }

        if self.events.iter().any(|e| e.name == name) {
            return Err(LogPipelineError::DuplicateEvent(name));
        }

        let anchored = format!("^(?:{})$", expand_tokens(pattern));
        let regex = Regex::new(&anchored).map_err(|e| LogPipelineError::EventPattern {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        debug!(event = %name, pattern, "registered event");

        self.events.push(CompiledEvent {
            name,
            pattern: pattern.to_owned(),
            regex,
        });
        Ok(self)
    }

    /// 빌더 형태로 이벤트를 등록합니다.
    pub fn with_event(
        mut self,
        name: impl Into<String>,
        pattern: &str,
    ) -> Result<Self, LogPipelineError> {
        self.register(name, pattern)?;
        Ok(self)
    }

    /// 이벤트 정의 목록에서 레지스트리를 생성합니다. 목록 순서가 매칭 순서입니다.
    pub fn from_definitions(definitions: &[EventDefinition]) -> Result<Self, LogPipelineError> {
        let mut registry = Self::new();
        for def in definitions {
            registry.register(def.name.as_str(), &def.pattern)?;
        }
        Ok(registry)
    }

    /// 설정에서 레지스트리를 생성합니다.
    ///
    /// 정의 파일(`definitions_file`)의 이벤트가 먼저, 인라인 정의가 그 뒤에 등록됩니다.
    pub async fn from_config(config: &EventsConfig) -> Result<Self, LogPipelineError> {
        let mut definitions = Vec::new();

        if !config.definitions_file.is_empty() {
            definitions = EventLoader::load_file(&config.definitions_file).await?;
        }
        definitions.extend(config.definitions.iter().cloned());

        let registry = Self::from_definitions(&definitions)?;

        info!(
            count = registry.len(),
            file = %config.definitions_file,
            "event registry ready"
        );

        Ok(registry)
    }

    /// 본문에 처음으로 매칭되는 이벤트를 찾습니다.
    pub fn match_line(&self, remainder: &str) -> Option<EventMatch<'_>> {
        self.events.iter().find_map(|event| {
            let caps = event.regex.captures(remainder)?;

            let fields = event
                .regex
                .capture_names()
                .flatten()
                .filter_map(|group| {
                    caps.name(group)
                        .map(|m| (group.to_owned(), m.as_str().to_owned()))
                })
                .collect();

            Some(EventMatch {
                name: &event.name,
                fields,
            })
        })
    }

    /// 등록된 이벤트 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 등록 순서대로 이벤트 이름을 순회합니다.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| e.name.as_str())
    }

    /// 이름으로 등록 시의 원본 패턴을 조회합니다.
    pub fn pattern(&self, name: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.pattern.as_str())
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("events", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
