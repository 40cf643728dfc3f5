//! 로그 수집 모듈 -- 파서에 원시 라인을 공급하는 두 가지 소스
//!
//! # 수집 소스
//! - [`RemoteLogListener`]: 게임 서버가 UDP로 스트리밍하는 원격 로그 수신
//! - [`LineSource`]: 로그 파일을 한 줄씩 읽는 동기 반복자
//!
//! # 아키텍처
//! 두 소스 모두 채널이나 별도 태스크 없이 파서를 직접 호출합니다.
//! 데이터그램(또는 라인) 하나를 끝까지 처리한 뒤에 다음 것을 읽습니다.

pub mod file;
pub mod udp;

pub use file::{LineSource, for_each_line};
pub use udp::{
    ListenerStats, MAX_PACKET_SIZE, PACKET_MARKER, PACKET_TRAILER, PacketError,
    RemoteLogListener, validate_datagram,
};

/// 수신기 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerStatus {
    /// 실행 대기 중
    Idle,
    /// 수신 루프 실행 중
    Running,
    /// 취소 신호로 정상 종료됨
    Stopped,
    /// 에러로 중단됨
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_status_equality() {
        assert_eq!(ListenerStatus::Idle, ListenerStatus::Idle);
        assert_ne!(ListenerStatus::Running, ListenerStatus::Stopped);
        assert_eq!(
            ListenerStatus::Failed("x".to_owned()),
            ListenerStatus::Failed("x".to_owned())
        );
    }
}
