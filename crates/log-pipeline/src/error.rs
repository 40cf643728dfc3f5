//! 로그 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 설정, 이벤트 레지스트리 구성, 수집기에서 발생하는 에러를 표현합니다.
//! 라인 파싱은 에러를 만들지 않습니다 (인식 불가 라인은 버리고, 미매칭은 unknown으로 보냄).
//! `From<LogPipelineError> for HlLogError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use std::net::SocketAddr;

use bytes::Bytes;
use hllog_core::error::{ConfigError, HlLogError, PipelineError};

use crate::collector::PacketError;

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 프레이밍이 잘못된 데이터그램 (fail-closed 정책에서 수신 루프 종료)
    #[error("invalid packet from {peer} ({} bytes): {reason}", payload.len())]
    InvalidPacket {
        /// 송신 주소
        peer: SocketAddr,
        /// 검증 실패 사유
        #[source]
        reason: PacketError,
        /// 수신한 원본 페이로드 (진단용)
        payload: Bytes,
    },

    /// 이벤트 패턴 컴파일 실패
    #[error("invalid pattern for event '{name}': {reason}")]
    EventPattern {
        /// 이벤트 이름
        name: String,
        /// 실패 사유
        reason: String,
    },

    /// 같은 이름의 이벤트가 이미 등록됨
    #[error("duplicate event name: {0}")]
    DuplicateEvent(String),

    /// 이벤트 정의 파일 로딩 실패
    #[error("event definition load error: {path}: {reason}")]
    EventLoad {
        /// 정의 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 수집기 에러 (소켓 바인드, 수신 실패, 파일 열기 등)
    #[error("collector error: {source_type}: {reason}")]
    Collector {
        /// 수집 소스 유형 (udp, file)
        source_type: String,
        /// 에러 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LogPipelineError> for HlLogError {
    fn from(err: LogPipelineError) -> Self {
        if matches!(err, LogPipelineError::InvalidPacket { .. }) {
            return HlLogError::Pipeline(PipelineError::Transport(err.to_string()));
        }

        match err {
            LogPipelineError::Config { field, reason } => {
                HlLogError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogPipelineError::Io(e) => HlLogError::Io(e),
            other => HlLogError::Pipeline(PipelineError::InitFailed(other.to_string())),
        }
    }
}
