//! 평판 조회 추상화
//!
//! [`ReputationLookup`]은 세션이 평판 서비스를 호출하는 유일한 경로입니다.
//! 운영 코드는 `fraudscan-reputation-client`의 HTTP 클라이언트를, 테스트는
//! 호출 횟수와 응답을 조절할 수 있는 mock 구현을 사용합니다.
//!
//! ```text
//! ┌──────────────┐
//! │ ScanSession  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ ReputationLookup │ (trait)
//! └──────────────────┘
//!      │        │
//!      ▼        ▼
//!   ┌──────┐ ┌──────┐
//!   │ HTTP │ │ Mock │
//!   └──┬───┘ └──────┘
//!      │
//!      ▼
//!  GET {endpoint_base}/reputation/{key}
//! ```

use std::future::Future;

use crate::error::LookupFailure;
use crate::types::{LookupKey, ReputationRecord};

/// 조회 결과: 성공 레코드 또는 분류된 실패
pub type LookupResult = Result<ReputationRecord, LookupFailure>;

/// 평판 서비스 조회 trait
///
/// # 계약
///
/// - 호출 한 번에 네트워크 요청은 정확히 한 번이며, 재시도나 캐싱은 하지 않습니다.
/// - 반환된 future는 반드시 성공 또는 실패로 완료되어야 합니다.
///   영원히 대기하는 구현은 세션을 `LOOKING_UP`에 묶어 둡니다.
/// - `key`는 비어 있지 않아야 합니다 (호출자 책임).
/// - 구현은 내부 상태를 갖지 않으며 각 호출은 독립적입니다.
pub trait ReputationLookup: Send + Sync + 'static {
    /// 키에 대한 평판을 조회합니다.
    fn lookup(&self, key: &LookupKey) -> impl Future<Output = LookupResult> + Send;
}

/// 테스트용 Mock 평판 조회
///
/// 설정된 응답을 돌려주고 호출 횟수를 기록합니다.
/// `hold()`를 사용하면 `release()`가 호출될 때까지 응답을 보류하여
/// 조회가 진행 중인 상태를 재현할 수 있습니다.
#[cfg(test)]
pub struct MockReputationLookup {
    response: std::sync::Mutex<LookupResult>,
    calls: std::sync::atomic::AtomicUsize,
    gate: Option<tokio::sync::Semaphore>,
}

#[cfg(test)]
impl MockReputationLookup {
    /// 항상 `record`를 돌려주는 mock을 생성합니다.
    pub fn returning(record: ReputationRecord) -> Self {
        Self::with_result(Ok(record))
    }

    /// 항상 `failure`를 돌려주는 mock을 생성합니다.
    pub fn failing(failure: LookupFailure) -> Self {
        Self::with_result(Err(failure))
    }

    fn with_result(result: LookupResult) -> Self {
        Self {
            response: std::sync::Mutex::new(result),
            calls: std::sync::atomic::AtomicUsize::new(0),
            gate: None,
        }
    }

    /// `release()` 전까지 응답을 보류하도록 설정합니다.
    pub fn hold(mut self) -> Self {
        self.gate = Some(tokio::sync::Semaphore::new(0));
        self
    }

    /// 보류 중인 응답 하나를 내보냅니다.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// 지금까지의 조회 호출 횟수
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl ReputationLookup for MockReputationLookup {
    async fn lookup(&self, _key: &LookupKey) -> LookupResult {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.response
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|_| Err(LookupFailure::unknown("mock poisoned")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::types::RiskLevel;

    #[tokio::test]
    async fn mock_returns_record_and_counts_calls() {
        let mock =
            MockReputationLookup::returning(ReputationRecord::new(RiskLevel::Low, 3.0, "ok", 5));
        let result = mock.lookup(&LookupKey::new("U-1001")).await;
        assert_eq!(result.unwrap().risk_level(), RiskLevel::Low);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn mock_returns_failure() {
        let mock = MockReputationLookup::failing(LookupFailure::network("down"));
        let err = mock.lookup(&LookupKey::new("x")).await.unwrap_err();
        assert_eq!(err.kind, FailureKind::Network);
    }

    #[tokio::test]
    async fn held_mock_waits_for_release() {
        let mock = std::sync::Arc::new(
            MockReputationLookup::failing(LookupFailure::network("down")).hold(),
        );
        let task = {
            let mock = std::sync::Arc::clone(&mock);
            tokio::spawn(async move { mock.lookup(&LookupKey::new("x")).await })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());
        mock.release();
        assert!(task.await.unwrap().is_err());
    }
}
