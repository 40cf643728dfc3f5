//! UDP 원격 로그 수신기
//!
//! 게임 서버의 원격 로그(`logaddress_add`) 스트림을 받습니다.
//! 데이터그램 형식: `FF FF FF FF` 마커 + 로그 라인 + `\n\0` 트레일러, 최대 1400 바이트.
//!
//! 수신기는 설정된 원격 주소 하나와 짝을 이루며, 다른 주소에서 온 데이터그램은
//! 프레이밍 검사 전에 버립니다. 프레이밍이 잘못된 데이터그램은 기본 정책에서
//! 수신 루프를 종료시킵니다 (fail-closed). 수신 전용이며 아무것도 보내지 않습니다.

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use hllog_core::config::InvalidPacketPolicy;
use hllog_core::metrics as m;
use hllog_core::pipeline::EntrySink;

use super::ListenerStatus;
use crate::config::ListenerSettings;
use crate::error::LogPipelineError;
use crate::parser::LogLineParser;

/// 수신 버퍼 크기 (데이터그램 최대 크기)
pub const MAX_PACKET_SIZE: usize = 1400;

/// 데이터그램 시작 마커
pub const PACKET_MARKER: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];

/// 데이터그램 끝 트레일러
pub const PACKET_TRAILER: &[u8] = b"\n\0";

/// 데이터그램 프레이밍 검증 실패 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PacketError {
    /// 빈 데이터그램
    #[error("empty datagram")]
    Empty,
    /// `FF FF FF FF`로 시작하지 않음
    #[error("missing FF FF FF FF marker")]
    MissingMarker,
    /// `\n\0`으로 끝나지 않음
    #[error("missing \\n\\0 trailer")]
    MissingTrailer,
}

impl PacketError {
    /// 메트릭 레이블 값
    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::MissingMarker => "marker",
            Self::MissingTrailer => "trailer",
        }
    }
}

/// 데이터그램 프레이밍을 검증합니다. 마커와 트레일러는 제거하지 않습니다.
pub fn validate_datagram(payload: &[u8]) -> Result<(), PacketError> {
    if payload.is_empty() {
        return Err(PacketError::Empty);
    }
    if !payload.starts_with(PACKET_MARKER) {
        return Err(PacketError::MissingMarker);
    }
    if !payload.ends_with(PACKET_TRAILER) {
        return Err(PacketError::MissingTrailer);
    }
    Ok(())
}

/// 수신 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// 기대한 원격 주소에서 받은 데이터그램 수
    pub received: u64,
    /// 검증을 통과해 파서로 넘긴 데이터그램 수
    pub forwarded: u64,
    /// 프레이밍 검증에 실패한 데이터그램 수
    pub rejected: u64,
    /// 다른 주소에서 와서 무시한 데이터그램 수
    pub foreign: u64,
}

/// IPv4-mapped IPv6 주소(`::ffff:a.b.c.d`)를 IPv4 주소로 정규화합니다.
///
/// `[::]`에 바인드한 듀얼 스택 소켓은 IPv4 송신자를 매핑된 형태로 보고합니다.
fn canonical(addr: SocketAddr) -> SocketAddr {
    SocketAddr::new(addr.ip().to_canonical(), addr.port())
}

/// UDP 원격 로그 수신기
pub struct RemoteLogListener {
    socket: UdpSocket,
    local_addr: SocketAddr,
    /// 정규화된 원격 주소 (수신 주소와 비교용)
    remote: SocketAddr,
    settings: ListenerSettings,
    status: ListenerStatus,
    stats: ListenerStats,
}

impl RemoteLogListener {
    /// 로컬 주소에 소켓을 바인드합니다.
    pub async fn bind(settings: ListenerSettings) -> Result<Self, LogPipelineError> {
        let socket = UdpSocket::bind(settings.local_addr)
            .await
            .map_err(|e| LogPipelineError::Collector {
                source_type: "udp".to_owned(),
                reason: format!("failed to bind to {}: {e}", settings.local_addr),
            })?;

        let local_addr = socket.local_addr()?;

        info!(
            local = %local_addr,
            remote = %settings.remote_addr,
            "remote log listener bound"
        );

        Ok(Self {
            socket,
            local_addr,
            remote: canonical(settings.remote_addr),
            settings,
            status: ListenerStatus::Idle,
            stats: ListenerStats::default(),
        })
    }

    /// 실제 바인드된 로컬 주소 (포트 0으로 바인드한 경우 할당된 포트 포함)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 데이터그램을 받아들이는 원격 주소
    pub fn remote_addr(&self) -> SocketAddr {
        self.settings.remote_addr
    }

    /// 현재 상태
    pub fn status(&self) -> &ListenerStatus {
        &self.status
    }

    /// 지금까지의 수신 통계
    pub fn stats(&self) -> ListenerStats {
        self.stats
    }

    /// 수신 루프를 실행합니다.
    ///
    /// 데이터그램 하나를 파서로 끝까지 처리한 뒤 다음 데이터그램을 읽습니다.
    /// 취소되면 `Ok(통계)`를 반환합니다.
    ///
    /// # Errors
    /// - `Terminate` 정책에서 프레이밍이 잘못된 데이터그램: [`LogPipelineError::InvalidPacket`]
    /// - 소켓 수신 실패: [`LogPipelineError::Collector`]
    pub async fn run<S: EntrySink>(
        &mut self,
        parser: &mut LogLineParser<S>,
        cancel: CancellationToken,
    ) -> Result<ListenerStats, LogPipelineError> {
        self.status = ListenerStatus::Running;
        info!(
            local = %self.local_addr,
            remote = %self.settings.remote_addr,
            policy = ?self.settings.invalid_packet_policy,
            "remote log listener started"
        );

        let mut buf = [0u8; MAX_PACKET_SIZE];

        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => None,
                result = self.socket.recv_from(&mut buf) => Some(result),
            };

            let Some(result) = received else {
                info!(
                    received = self.stats.received,
                    forwarded = self.stats.forwarded,
                    "remote log listener received shutdown signal"
                );
                self.status = ListenerStatus::Stopped;
                return Ok(self.stats);
            };

            let (len, peer) = match result {
                Ok(v) => v,
                Err(e) => {
                    error!(error = %e, "udp receive failed");
                    self.status = ListenerStatus::Failed(e.to_string());
                    return Err(LogPipelineError::Collector {
                        source_type: "udp".to_owned(),
                        reason: format!("receive error: {e}"),
                    });
                }
            };

            if canonical(peer) != self.remote {
                self.stats.foreign += 1;
                metrics::counter!(m::LISTENER_PACKETS_FOREIGN_TOTAL).increment(1);
                debug!(%peer, len, "ignoring datagram from unexpected source");
                continue;
            }

            self.stats.received += 1;
            metrics::counter!(m::LISTENER_PACKETS_RECEIVED_TOTAL).increment(1);

            let payload = &buf[..len];
            match validate_datagram(payload) {
                Ok(()) => {
                    self.stats.forwarded += 1;
                    parser.parse_bytes(payload);
                }
                Err(reason) => {
                    self.stats.rejected += 1;
                    metrics::counter!(
                        m::LISTENER_PACKETS_REJECTED_TOTAL,
                        m::LABEL_REASON => reason.label()
                    )
                    .increment(1);

                    match self.settings.invalid_packet_policy {
                        InvalidPacketPolicy::Drop => {
                            warn!(%peer, len, %reason, "dropping invalid packet");
                        }
                        InvalidPacketPolicy::Terminate => {
                            error!(%peer, len, %reason, "invalid packet, stopping listener");
                            let err = LogPipelineError::InvalidPacket {
                                peer,
                                reason,
                                payload: Bytes::copy_from_slice(payload),
                            };
                            self.status = ListenerStatus::Failed(err.to_string());
                            return Err(err);
                        }
                    }
                }
            }
        }
    }
}
