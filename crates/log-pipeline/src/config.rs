//! 리스너 설정
//!
//! [`ListenerSettings`]는 core의 [`ListenerConfig`](hllog_core::config::ListenerConfig)를
//! 기반으로 주소 문자열을 `SocketAddr`로 해석한 실행용 설정입니다.
//!
//! # 사용 예시
//! ```
//! use hllog_core::config::HlLogConfig;
//! use hllog_pipeline::config::ListenerSettings;
//!
//! let core_config = HlLogConfig::default();
//! let settings = ListenerSettings::from_core(&core_config.listener)?;
//! assert_eq!(settings.remote_addr.port(), 27015);
//! # Ok::<(), hllog_pipeline::LogPipelineError>(())
//! ```

use std::net::SocketAddr;

use hllog_core::config::{InvalidPacketPolicy, ListenerConfig};

use crate::error::LogPipelineError;

/// UDP 원격 로그 리스너 실행 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSettings {
    /// 바인드할 로컬 주소
    pub local_addr: SocketAddr,
    /// 로그를 보내는 게임 서버 주소
    pub remote_addr: SocketAddr,
    /// 잘못된 데이터그램 처리 정책
    pub invalid_packet_policy: InvalidPacketPolicy,
}

impl ListenerSettings {
    /// 새 설정을 생성합니다. 정책은 기본값(`Terminate`)입니다.
    pub fn new(local_addr: SocketAddr, remote_addr: SocketAddr) -> Self {
        Self {
            local_addr,
            remote_addr,
            invalid_packet_policy: InvalidPacketPolicy::default(),
        }
    }

    /// 잘못된 데이터그램 처리 정책을 설정합니다.
    pub fn with_policy(mut self, policy: InvalidPacketPolicy) -> Self {
        self.invalid_packet_policy = policy;
        self
    }

    /// core의 `ListenerConfig`에서 설정을 생성합니다.
    pub fn from_core(core: &ListenerConfig) -> Result<Self, LogPipelineError> {
        let settings = Self {
            local_addr: parse_addr("listener.local_addr", &core.local_addr)?,
            remote_addr: parse_addr("listener.remote_addr", &core.remote_addr)?,
            invalid_packet_policy: core.invalid_packet_policy,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 원격 주소는 실제 송신자와 비교되므로 미지정 IP나 0번 포트는 허용하지 않습니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        if self.remote_addr.ip().is_unspecified() {
            return Err(LogPipelineError::Config {
                field: "listener.remote_addr".to_owned(),
                reason: format!(
                    "'{}' can never be a datagram source address",
                    self.remote_addr
                ),
            });
        }

        if self.remote_addr.port() == 0 {
            return Err(LogPipelineError::Config {
                field: "listener.remote_addr".to_owned(),
                reason: "port must not be 0".to_owned(),
            });
        }

        Ok(())
    }
}

fn parse_addr(field: &str, value: &str) -> Result<SocketAddr, LogPipelineError> {
    value.parse().map_err(|e| LogPipelineError::Config {
        field: field.to_owned(),
        reason: format!("'{value}' is not a valid socket address: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_core_defaults() {
        let settings = ListenerSettings::from_core(&ListenerConfig::default()).unwrap();
        assert_eq!(settings.local_addr, "0.0.0.0:27500".parse().unwrap());
        assert_eq!(settings.remote_addr, "127.0.0.1:27015".parse().unwrap());
        assert_eq!(settings.invalid_packet_policy, InvalidPacketPolicy::Terminate);
    }

    #[test]
    fn from_core_preserves_policy() {
        let core = ListenerConfig {
            invalid_packet_policy: InvalidPacketPolicy::Drop,
            ..Default::default()
        };
        let settings = ListenerSettings::from_core(&core).unwrap();
        assert_eq!(settings.invalid_packet_policy, InvalidPacketPolicy::Drop);
    }

    #[test]
    fn from_core_rejects_bad_address() {
        let core = ListenerConfig {
            local_addr: "not-an-address".to_owned(),
            ..Default::default()
        };
        let err = ListenerSettings::from_core(&core).unwrap_err();
        assert!(
            matches!(err, LogPipelineError::Config { ref field, .. } if field == "listener.local_addr")
        );
    }

    #[test]
    fn rejects_unspecified_remote() {
        let core = ListenerConfig {
            remote_addr: "0.0.0.0:27015".to_owned(),
            ..Default::default()
        };
        assert!(ListenerSettings::from_core(&core).is_err());

        let core = ListenerConfig {
            remote_addr: "127.0.0.1:0".to_owned(),
            ..Default::default()
        };
        assert!(ListenerSettings::from_core(&core).is_err());
    }

    #[test]
    fn builder_style_policy() {
        let settings = ListenerSettings::new(
            "127.0.0.1:0".parse().unwrap(),
            "127.0.0.1:27015".parse().unwrap(),
        )
        .with_policy(InvalidPacketPolicy::Drop);
        assert_eq!(settings.invalid_packet_policy, InvalidPacketPolicy::Drop);
        settings.validate().unwrap();
    }
}
