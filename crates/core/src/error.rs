//! 에러 타입 — 도메인별 에러 정의
//!
//! 라인 파싱 자체는 에러를 만들지 않습니다. 인식할 수 없는 라인은 조용히 버려지고,
//! 매칭되지 않는 이벤트는 unknown 엔트리로 전달됩니다. 여기 정의된 에러는
//! 설정, 초기화, 전송 계층에서만 발생합니다.

/// hllog 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HlLogError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 파이프라인 초기화 실패 (이벤트 정의 로드, 소켓 바인드 등)
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 전송 계층 프로토콜 에러 (잘못된 데이터그램 프레이밍)
    #[error("transport error: {0}")]
    Transport(String),
}
