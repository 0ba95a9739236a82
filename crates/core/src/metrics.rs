//! 메트릭 상수 및 설명 등록
//!
//! 스캔 세션과 평판 조회 메트릭의 이름을 한곳에서 정의합니다.
//! 레코더는 설치하지 않으므로 기본적으로 no-op이며, 임베딩하는 쪽에서
//! 레코더를 설치하면 그대로 수집됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `fraudscan_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 실패 분류 레이블 키 (local_validation, network, not_found, malformed_response, unknown)
pub const LABEL_KIND: &str = "kind";

// ─── Session 메트릭 ────────────────────────────────────────────────

/// Session: 수신된 캡처 이벤트 수 (counter)
pub const SESSION_CAPTURES_TOTAL: &str = "fraudscan_session_captures_total";

/// Session: 조회 중이거나 결과 표시 중이라 무시된 캡처 수 (counter)
pub const SESSION_CAPTURES_IGNORED_TOTAL: &str = "fraudscan_session_captures_ignored_total";

// ─── Lookup 메트릭 ─────────────────────────────────────────────────

/// Lookup: 완료된 조회 수 (counter, label: result)
pub const LOOKUPS_TOTAL: &str = "fraudscan_lookups_total";

/// Lookup: 분류별 실패 수 (counter, label: kind)
pub const LOOKUP_FAILURES_TOTAL: &str = "fraudscan_lookup_failures_total";

/// Lookup: 요청 소요 시간 (histogram, 초)
pub const LOOKUP_DURATION_SECONDS: &str = "fraudscan_lookup_duration_seconds";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 조회 소요 시간 히스토그램 버킷 (초)
///
/// 10ms ~ 최대 요청 타임아웃(300s)
pub const LOOKUP_DURATION_BUCKETS: [f64; 9] = [0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 30.0, 300.0];

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 레코더 설치 후 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        SESSION_CAPTURES_TOTAL,
        "Total number of capture events delivered to scan sessions"
    );
    describe_counter!(
        SESSION_CAPTURES_IGNORED_TOTAL,
        "Capture events ignored because a lookup or result was active"
    );
    describe_counter!(LOOKUPS_TOTAL, "Reputation lookups completed, by result");
    describe_counter!(
        LOOKUP_FAILURES_TOTAL,
        "Reputation lookup failures, by failure kind"
    );
    describe_histogram!(
        LOOKUP_DURATION_SECONDS,
        "Reputation lookup latency in seconds"
    );
}
