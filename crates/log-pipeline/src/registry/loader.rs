//! 이벤트 정의 파일 로더 -- YAML 파일에서 (이름, 패턴) 목록을 읽습니다.
//!
//! 파일 형식:
//! ```yaml
//! events:
//!   - name: say
//!     pattern: '"{player}" say {string}'
//! ```
//! 파일 안의 순서가 그대로 등록(매칭) 순서가 됩니다.

use std::path::Path;

use serde::Deserialize;

use hllog_core::config::EventDefinition;

use crate::error::LogPipelineError;

/// 정의 파일 최대 크기
const MAX_EVENT_FILE_SIZE: u64 = 1024 * 1024; // 1MB
/// 파일 하나에 허용되는 최대 이벤트 수
const MAX_EVENTS_COUNT: usize = 10_000;

/// YAML 문서 최상위 구조
#[derive(Debug, Deserialize)]
struct EventFile {
    #[serde(default)]
    events: Vec<EventDefinition>,
}

/// 이벤트 정의 파일 로더
pub struct EventLoader;

impl EventLoader {
    /// YAML 파일에서 이벤트 정의를 로드합니다.
    ///
    /// # Errors
    /// - 파일을 읽을 수 없거나 크기 제한을 넘는 경우
    /// - YAML 형식이 잘못되었거나 이벤트 수가 제한을 넘는 경우
    pub async fn load_file(
        path: impl AsRef<Path>,
    ) -> Result<Vec<EventDefinition>, LogPipelineError> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| LogPipelineError::EventLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > MAX_EVENT_FILE_SIZE {
            return Err(LogPipelineError::EventLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_EVENT_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LogPipelineError::EventLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file: {e}"),
                })?;

        let events = Self::parse_yaml(&content, &path.display().to_string())?;

        tracing::info!(
            path = %path.display(),
            count = events.len(),
            "loaded event definitions"
        );

        Ok(events)
    }

    /// YAML 문자열에서 이벤트 정의를 파싱합니다.
    pub fn parse_yaml(
        yaml_str: &str,
        source: &str,
    ) -> Result<Vec<EventDefinition>, LogPipelineError> {
        let file: EventFile =
            serde_yaml::from_str(yaml_str).map_err(|e| LogPipelineError::EventLoad {
                path: source.to_owned(),
                reason: format!("YAML parse error: {e}"),
            })?;

        if file.events.len() > MAX_EVENTS_COUNT {
            return Err(LogPipelineError::EventLoad {
                path: source.to_owned(),
                reason: format!(
                    "too many events: {} (max: {MAX_EVENTS_COUNT})",
                    file.events.len()
                ),
            });
        }

        Ok(file.events)
    }
}
