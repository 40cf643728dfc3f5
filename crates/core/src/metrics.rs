//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 파서와 전송 계층은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 호출은 아무 효과가 없습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `hllog_`
//! - 구성 요소: `parser_`, `listener_`, `daemon_`
//! - 접미어: `_total` (counter)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 이벤트 이름 레이블 키
pub const LABEL_EVENT: &str = "event";

/// 거부 사유 레이블 키 (marker, trailer, empty)
pub const LABEL_REASON: &str = "reason";

// ─── Parser 메트릭 ────────────────────────────────────────────────

/// Parser: 입력된 전체 라인 수 (counter)
pub const PARSER_LINES_TOTAL: &str = "hllog_parser_lines_total";

/// Parser: 헤더 불일치로 버려진 라인 수 (counter)
pub const PARSER_LINES_DISCARDED_TOTAL: &str = "hllog_parser_lines_discarded_total";

/// Parser: 이벤트 매칭 수 (counter, label: event)
pub const PARSER_EVENTS_MATCHED_TOTAL: &str = "hllog_parser_events_matched_total";

/// Parser: unknown 엔트리 수 (counter)
pub const PARSER_EVENTS_UNKNOWN_TOTAL: &str = "hllog_parser_events_unknown_total";

// ─── Listener 메트릭 ──────────────────────────────────────────────

/// Listener: 기대한 원격 주소에서 수신한 데이터그램 수 (counter)
pub const LISTENER_PACKETS_RECEIVED_TOTAL: &str = "hllog_listener_packets_received_total";

/// Listener: 프레이밍 검증에 실패한 데이터그램 수 (counter, label: reason)
pub const LISTENER_PACKETS_REJECTED_TOTAL: &str = "hllog_listener_packets_rejected_total";

/// Listener: 다른 주소에서 와서 무시된 데이터그램 수 (counter)
pub const LISTENER_PACKETS_FOREIGN_TOTAL: &str = "hllog_listener_packets_foreign_total";

// ─── Daemon 메트릭 ────────────────────────────────────────────────

/// Daemon: 빌드 정보 (gauge, 항상 1, label: version)
pub const DAEMON_BUILD_INFO: &str = "hllog_daemon_build_info";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    // Parser
    describe_counter!(
        PARSER_LINES_TOTAL,
        "Total number of raw lines handed to the parser"
    );
    describe_counter!(
        PARSER_LINES_DISCARDED_TOTAL,
        "Lines discarded because the L/RL timestamp header did not match"
    );
    describe_counter!(
        PARSER_EVENTS_MATCHED_TOTAL,
        "Entries matched by a registered event pattern, per event name"
    );
    describe_counter!(
        PARSER_EVENTS_UNKNOWN_TOTAL,
        "Entries routed to the unknown fallback"
    );

    // Listener
    describe_counter!(
        LISTENER_PACKETS_RECEIVED_TOTAL,
        "Datagrams received from the expected remote peer"
    );
    describe_counter!(
        LISTENER_PACKETS_REJECTED_TOTAL,
        "Datagrams with invalid framing, per reason"
    );
    describe_counter!(
        LISTENER_PACKETS_FOREIGN_TOTAL,
        "Datagrams ignored because they came from an unexpected source"
    );

    // Daemon
    describe_gauge!(DAEMON_BUILD_INFO, "Build information, always 1");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_all_does_not_panic() {
        // 레코더 없이 호출해도 패닉하지 않아야 함
        describe_all();
    }

    #[test]
    fn metric_names_share_prefix() {
        let names = [
            PARSER_LINES_TOTAL,
            PARSER_LINES_DISCARDED_TOTAL,
            PARSER_EVENTS_MATCHED_TOTAL,
            PARSER_EVENTS_UNKNOWN_TOTAL,
            LISTENER_PACKETS_RECEIVED_TOTAL,
            LISTENER_PACKETS_REJECTED_TOTAL,
            LISTENER_PACKETS_FOREIGN_TOTAL,
        ];
        for name in names {
            assert!(name.starts_with("hllog_"), "{name}");
            assert!(name.ends_with("_total"), "{name}");
        }
        assert!(DAEMON_BUILD_INFO.starts_with("hllog_"));
    }
}
