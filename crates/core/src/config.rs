//! 설정 관리 — hllog.toml 파싱 및 런타임 설정
//!
//! [`HlLogConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HLLOG_LISTENER_LOCAL_ADDR=0.0.0.0:27500` 형식)
//! 3. 설정 파일 (`hllog.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), hllog_core::error::HlLogError> {
//! use hllog_core::config::HlLogConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = HlLogConfig::load("hllog.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = HlLogConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, HlLogError};

/// hllog 통합 설정
///
/// `hllog.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HlLogConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// UDP 원격 로그 리스너 설정
    #[serde(default)]
    pub listener: ListenerConfig,
    /// 이벤트 레지스트리 정의
    #[serde(default)]
    pub events: EventsConfig,
    /// Prometheus 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl HlLogConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HlLogError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HlLogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HlLogError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HlLogError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HlLogError> {
        toml::from_str(toml_str).map_err(|e| {
            HlLogError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HLLOG_{SECTION}_{FIELD}`
    /// 예: `HLLOG_LISTENER_REMOTE_ADDR=10.0.0.5:27015`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HLLOG_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HLLOG_GENERAL_LOG_FORMAT");

        // Listener
        override_string(&mut self.listener.local_addr, "HLLOG_LISTENER_LOCAL_ADDR");
        override_string(
            &mut self.listener.remote_addr,
            "HLLOG_LISTENER_REMOTE_ADDR",
        );
        override_policy(
            &mut self.listener.invalid_packet_policy,
            "HLLOG_LISTENER_INVALID_PACKET_POLICY",
        );

        // Events
        override_string(
            &mut self.events.definitions_file,
            "HLLOG_EVENTS_DEFINITIONS_FILE",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "HLLOG_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "HLLOG_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "HLLOG_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HlLogError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 리스너 주소 검증
        validate_socket_addr("listener.local_addr", &self.listener.local_addr)?;
        validate_socket_addr("listener.remote_addr", &self.listener.remote_addr)?;

        // 이벤트 정의 검증 (패턴 컴파일은 파이프라인 쪽 책임)
        for (idx, def) in self.events.definitions.iter().enumerate() {
            if def.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("events.definitions[{idx}].name"),
                    reason: "event name must not be empty".to_owned(),
                }
                .into());
            }
            if def.pattern.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("events.definitions[{idx}].pattern"),
                    reason: format!("pattern for event '{}' must not be empty", def.name),
                }
                .into());
            }
        }

        // metrics 검증
        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics.port".to_owned(),
                reason: "port must be non-zero when metrics are enabled".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 잘못된 프레이밍의 데이터그램을 받았을 때의 처리 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPacketPolicy {
    /// 전송 계층 에러를 보고하고 수신 루프를 종료 (기본값)
    #[default]
    Terminate,
    /// 경고 로그를 남기고 해당 데이터그램만 버린 뒤 계속 수신
    Drop,
}

impl InvalidPacketPolicy {
    /// 문자열에서 정책을 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "terminate" | "fail" | "close" => Some(Self::Terminate),
            "drop" | "skip" | "continue" => Some(Self::Drop),
            _ => None,
        }
    }
}

/// UDP 원격 로그 리스너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// 바인드할 로컬 주소
    pub local_addr: String,
    /// 로그를 보내는 게임 서버 주소 (이 주소에서 온 데이터그램만 처리)
    pub remote_addr: String,
    /// 잘못된 데이터그램 처리 정책
    pub invalid_packet_policy: InvalidPacketPolicy,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            local_addr: "0.0.0.0:27500".to_owned(),
            remote_addr: "127.0.0.1:27015".to_owned(),
            invalid_packet_policy: InvalidPacketPolicy::Terminate,
        }
    }
}

/// 이벤트 정의 하나 (이름 + 라인 매칭 패턴)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    /// 이벤트 이름
    pub name: String,
    /// 정규식 패턴 (`{player}` 등 토큰 사용 가능)
    pub pattern: String,
}

impl EventDefinition {
    /// 새 이벤트 정의를 생성합니다.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// 이벤트 레지스트리 설정
///
/// 등록 순서가 곧 매칭 순서입니다. 정의 파일의 이벤트가 먼저,
/// 인라인 정의가 그 뒤에 등록됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// YAML 이벤트 정의 파일 경로 (빈 문자열이면 사용 안 함)
    pub definitions_file: String,
    /// 인라인 이벤트 정의
    pub definitions: Vec<EventDefinition>,
}

/// Prometheus 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 리슨 주소
    pub listen_addr: String,
    /// 리슨 포트
    pub port: u16,
    /// 엔드포인트 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9109,
            endpoint: "/metrics".to_owned(),
        }
    }
}

fn validate_socket_addr(field: &str, value: &str) -> Result<(), HlLogError> {
    value.parse::<SocketAddr>().map_err(|e| ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: format!("'{value}' is not a valid socket address: {e}"),
    })?;
    Ok(())
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_policy(target: &mut InvalidPacketPolicy, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match InvalidPacketPolicy::from_str_loose(&val) {
            Some(parsed) => *target = parsed,
            None => warn!(
                env_key,
                value = val.as_str(),
                "unknown invalid packet policy in env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = HlLogConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.listener.local_addr, "0.0.0.0:27500");
        assert_eq!(
            config.listener.invalid_packet_policy,
            InvalidPacketPolicy::Terminate
        );
        assert!(config.events.definitions.is_empty());
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn default_config_is_valid() {
        HlLogConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[general]
log_level = "debug"
log_format = "pretty"

[listener]
local_addr = "0.0.0.0:9000"
remote_addr = "10.0.0.5:27015"
invalid_packet_policy = "drop"

[events]
definitions_file = "/etc/hllog/events.yml"

[[events.definitions]]
name = "say"
pattern = '{player} say {string}'

[[events.definitions]]
name = "connected"
pattern = '{player} connected, address {string}'

[metrics]
enabled = true
port = 9200
"#;
        let config = HlLogConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.listener.remote_addr, "10.0.0.5:27015");
        assert_eq!(
            config.listener.invalid_packet_policy,
            InvalidPacketPolicy::Drop
        );
        assert_eq!(config.events.definitions.len(), 2);
        assert_eq!(config.events.definitions[0].name, "say");
        assert_eq!(config.events.definitions[1].name, "connected");
        assert_eq!(config.metrics.port, 9200);
        config.validate().unwrap();
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let config = HlLogConfig::parse("[listener]\nlocal_addr = \"127.0.0.1:1\"").unwrap();
        assert_eq!(config.listener.local_addr, "127.0.0.1:1");
        assert_eq!(config.listener.remote_addr, "127.0.0.1:27015");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = HlLogConfig::parse("invalid = [[[toml");
        assert!(matches!(
            result,
            Err(HlLogError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn unknown_policy_fails_to_parse() {
        let result = HlLogConfig::parse("[listener]\ninvalid_packet_policy = \"explode\"");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = HlLogConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = HlLogConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_bad_remote_addr() {
        let mut config = HlLogConfig::default();
        config.listener.remote_addr = "gameserver".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("listener.remote_addr"));
    }

    #[test]
    fn validate_rejects_empty_event_name() {
        let mut config = HlLogConfig::default();
        config
            .events
            .definitions
            .push(EventDefinition::new(" ", "foo"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("events.definitions[0].name"));
    }

    #[test]
    fn validate_rejects_empty_event_pattern() {
        let mut config = HlLogConfig::default();
        config
            .events
            .definitions
            .push(EventDefinition::new("say", ""));
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_metrics_port_when_enabled() {
        let mut config = HlLogConfig::default();
        config.metrics.enabled = true;
        config.metrics.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn policy_from_str_loose() {
        assert_eq!(
            InvalidPacketPolicy::from_str_loose("DROP"),
            Some(InvalidPacketPolicy::Drop)
        );
        assert_eq!(
            InvalidPacketPolicy::from_str_loose("terminate"),
            Some(InvalidPacketPolicy::Terminate)
        );
        assert_eq!(InvalidPacketPolicy::from_str_loose("maybe"), None);
    }

    #[test]
    #[serial_test::serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트이므로 다른 스레드가 환경변수를 동시에 읽지 않습니다.
        unsafe { std::env::set_var("TEST_HLLOG_STR", "overridden") };
        override_string(&mut val, "TEST_HLLOG_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_HLLOG_STR") };
    }

    #[test]
    #[serial_test::serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = false;
        // SAFETY: serial 테스트이므로 다른 스레드가 환경변수를 동시에 읽지 않습니다.
        unsafe { std::env::set_var("TEST_HLLOG_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_HLLOG_BOOL_BAD");
        assert!(!val);
        unsafe { std::env::remove_var("TEST_HLLOG_BOOL_BAD") };
    }

    #[test]
    #[serial_test::serial]
    fn env_override_policy() {
        let mut policy = InvalidPacketPolicy::Terminate;
        // SAFETY: serial 테스트이므로 다른 스레드가 환경변수를 동시에 읽지 않습니다.
        unsafe { std::env::set_var("TEST_HLLOG_POLICY", "drop") };
        override_policy(&mut policy, "TEST_HLLOG_POLICY");
        assert_eq!(policy, InvalidPacketPolicy::Drop);

        unsafe { std::env::set_var("TEST_HLLOG_POLICY", "nonsense") };
        override_policy(&mut policy, "TEST_HLLOG_POLICY");
        assert_eq!(policy, InvalidPacketPolicy::Drop);
        unsafe { std::env::remove_var("TEST_HLLOG_POLICY") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut port = 9109;
        override_u16(&mut port, "TEST_HLLOG_NONEXISTENT_12345");
        assert_eq!(port, 9109);
    }

    #[test]
    fn config_serialize_roundtrip() {
        let mut config = HlLogConfig::default();
        config
            .events
            .definitions
            .push(EventDefinition::new("say", "{player} say {string}"));
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = HlLogConfig::parse(&toml_str).unwrap();
        assert_eq!(parsed.listener.local_addr, config.listener.local_addr);
        assert_eq!(parsed.events.definitions, config.events.definitions);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = HlLogConfig::from_file("/nonexistent/path/hllog.toml").await;
        assert!(matches!(
            result,
            Err(HlLogError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
