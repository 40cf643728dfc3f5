#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: 헤더 토크나이저, 프로퍼티 추출기, 값 구조 추론, 라인 파서
//! - [`registry`]: 순서 있는 이벤트 레지스트리와 YAML 정의 로더
//! - [`collector`]: UDP 원격 로그 수신기와 파일 라인 소스
//! - [`config`]: 리스너 설정 (core 설정 변환)
//! - [`error`]: 도메인 에러 타입

pub mod config;
pub mod error;

pub mod collector;
pub mod parser;
pub mod registry;

// --- 주요 타입 re-export ---

// 설정
pub use config::ListenerSettings;

// 에러
pub use error::LogPipelineError;

// 파서
pub use parser::{LogLineParser, ReadSummary, decode_line};

// 레지스트리
pub use registry::{EventLoader, EventMatch, EventRegistry};

// 수집기
pub use collector::{LineSource, ListenerStats, PacketError, RemoteLogListener};
