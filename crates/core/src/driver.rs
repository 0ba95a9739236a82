//! 스캔 세션 드라이버 -- 상태 머신을 tokio 위에서 구동
//!
//! [`ScanSession`]은 세션 하나의 [`SessionState`]를 소유하는 유일한 writer입니다.
//! 모든 이벤트 메서드가 `&mut self`를 받으므로 이벤트는 도착 순서대로 하나씩 처리되고,
//! 재진입은 불가능합니다.
//!
//! # 흐름
//! ```text
//! capture(payload) ──> transition() ──Effect::Lookup(key)──> tokio::spawn(lookup)
//!                                                                  │
//! wait_for_outcome() <──── JoinHandle ─────────────────────────────┘
//!        │
//!        └──> transition(LookupResolved) ──> watch::Sender<SessionState>
//! ```
//!
//! # 종료
//! [`ScanSession::teardown`] (또는 drop)은 진행 중인 조회 태스크를 중단합니다.
//! 태스크 핸들이 세션과 함께 사라지므로 늦게 도착한 결과는 어떤 상태도 바꾸지 못합니다.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{LookupFailure, SessionError};
use crate::lookup::{LookupResult, ReputationLookup};
use crate::metrics as names;
use crate::session::{Effect, Outcome, Phase, SessionEvent, SessionState, transition};
use crate::types::{LookupKey, ScanPayload};

/// 진행 중인 조회
struct InFlight {
    key: LookupKey,
    handle: JoinHandle<LookupResult>,
}

/// 스캔 세션 -- 캡처, 조회, 결과 표시, 리셋 사이클을 구동합니다.
///
/// # 사용 예시
/// ```ignore
/// let mut session = ScanSession::new(Arc::new(client));
/// session.capture("USER_ID|abc123")?;
/// let state = session.wait_for_outcome().await?;
/// // 결과 표시 ...
/// session.reset();
/// ```
pub struct ScanSession<L: ReputationLookup> {
    /// 로그 상관용 세션 ID
    id: String,
    /// 평판 조회 구현
    lookup: Arc<L>,
    /// 현재 상태
    state: SessionState,
    /// 표시 계층에 상태를 배포하는 채널
    state_tx: watch::Sender<SessionState>,
    /// 진행 중인 조회 (최대 하나)
    in_flight: Option<InFlight>,
    /// 캡처 권한 여부
    permission_granted: bool,
}

impl<L: ReputationLookup> ScanSession<L> {
    /// 권한이 허용된 `IDLE` 세션을 생성합니다.
    pub fn new(lookup: Arc<L>) -> Self {
        let state = SessionState::new();
        let (state_tx, _) = watch::channel(state.clone());
        let id = uuid::Uuid::new_v4().to_string();
        info!(session_id = %id, "scan session activated");
        Self {
            id,
            lookup,
            state,
            state_tx,
            in_flight: None,
            permission_granted: true,
        }
    }

    /// 세션 ID
    pub fn session_id(&self) -> &str {
        &self.id
    }

    /// 현재 상태
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 상태 변화를 구독합니다.
    ///
    /// 세션이 종료되면 receiver의 `changed()`가 에러를 반환합니다.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// 캡처 권한 여부
    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    /// 카메라 권한 신호를 반영합니다.
    ///
    /// 권한이 없으면 캡처 이벤트는 상태 머신에 도달하기 전에 거부됩니다.
    pub fn set_permission(&mut self, granted: bool) {
        if self.permission_granted != granted {
            info!(session_id = %self.id, granted, "capture permission changed");
        }
        self.permission_granted = granted;
    }

    /// 캡처 이벤트를 처리합니다.
    ///
    /// `IDLE`에서 유효한 키가 추출되면 조회 태스크를 시작합니다.
    /// 조회 중이거나 결과 표시 중이면 이벤트는 무시됩니다.
    /// tokio 런타임 안에서 호출해야 합니다.
    ///
    /// # Errors
    /// 권한이 거부된 상태면 `SessionError::PermissionDenied`를 반환합니다.
    pub fn capture(
        &mut self,
        payload: impl Into<ScanPayload>,
    ) -> Result<&SessionState, SessionError> {
        if !self.permission_granted {
            warn!(session_id = %self.id, "capture refused: permission denied");
            return Err(SessionError::PermissionDenied);
        }

        counter!(names::SESSION_CAPTURES_TOTAL).increment(1);
        if !self.apply(SessionEvent::Capture(payload.into())) {
            counter!(names::SESSION_CAPTURES_IGNORED_TOTAL).increment(1);
        }
        Ok(&self.state)
    }

    /// 진행 중인 조회가 끝날 때까지 기다린 뒤 결과를 반영합니다.
    ///
    /// 이미 결과나 에러를 표시 중이면 즉시 현재 상태를 돌려줍니다.
    /// 조회 태스크가 패닉 등으로 결과 없이 끝나면 `UNKNOWN` 실패로 처리하므로
    /// 세션은 항상 `LOOKING_UP`을 벗어납니다.
    ///
    /// # Errors
    /// `IDLE` 상태에서 호출하면 `SessionError::NothingInFlight`를 반환합니다.
    pub async fn wait_for_outcome(&mut self) -> Result<&SessionState, SessionError> {
        let Some(InFlight { key, handle }) = self.in_flight.take() else {
            if self.state.phase().is_showing() {
                return Ok(&self.state);
            }
            return Err(SessionError::NothingInFlight {
                phase: self.state.phase().to_string(),
            });
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(session_id = %self.id, key = %key, error = %e, "lookup task did not complete");
                Err(LookupFailure::unknown(format!("lookup task failed: {e}")))
            }
        };

        record_lookup_metrics(&result);
        let _ = self.apply(SessionEvent::LookupResolved { key, result });
        Ok(&self.state)
    }

    /// 캡처 후 결과까지 한 사이클을 실행합니다.
    ///
    /// 로컬 검증 실패는 네트워크 호출 없이 곧바로 에러 상태가 됩니다.
    pub async fn scan(
        &mut self,
        payload: impl Into<ScanPayload>,
    ) -> Result<&SessionState, SessionError> {
        self.capture(payload)?;
        if self.state.phase() == Phase::LookingUp {
            return self.wait_for_outcome().await;
        }
        Ok(&self.state)
    }

    /// 결과/에러 표시를 닫고 `IDLE`로 돌아갑니다.
    ///
    /// 표시 중이 아닐 때는 아무 일도 하지 않습니다.
    pub fn reset(&mut self) -> &SessionState {
        let _ = self.apply(SessionEvent::Reset);
        &self.state
    }

    /// 세션을 종료합니다.
    ///
    /// 진행 중인 조회는 중단되고 그 결과는 버려집니다.
    pub fn teardown(self) {
        info!(
            session_id = %self.id,
            phase = %self.state.phase(),
            in_flight = self.in_flight.is_some(),
            "scan session torn down"
        );
        // 나머지는 Drop에서 정리
    }

    /// 이벤트를 적용합니다. 무시된 이벤트면 `false`를 반환합니다.
    fn apply(&mut self, event: SessionEvent) -> bool {
        let t = transition(&self.state, event);
        if t.ignored {
            return false;
        }

        if let Some(Effect::Lookup(key)) = t.effect {
            self.spawn_lookup(key);
        }

        log_outcome(&self.id, &t.state);
        self.state = t.state;
        self.state_tx.send_replace(self.state.clone());
        true
    }

    fn spawn_lookup(&mut self, key: LookupKey) {
        debug!(session_id = %self.id, key = %key, "starting reputation lookup");
        let lookup = Arc::clone(&self.lookup);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let result = lookup.lookup(&task_key).await;
            histogram!(names::LOOKUP_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
            result
        });
        self.in_flight = Some(InFlight { key, handle });
    }
}

impl<L: ReputationLookup> Drop for ScanSession<L> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(session_id = %self.id, key = %in_flight.key, "aborting in-flight lookup");
            in_flight.handle.abort();
        }
    }
}

fn record_lookup_metrics(result: &LookupResult) {
    match result {
        Ok(_) => {
            counter!(names::LOOKUPS_TOTAL, names::LABEL_RESULT => "success").increment(1);
        }
        Err(failure) => {
            counter!(names::LOOKUPS_TOTAL, names::LABEL_RESULT => "failure").increment(1);
            counter!(names::LOOKUP_FAILURES_TOTAL, names::LABEL_KIND => failure.kind.as_label())
                .increment(1);
        }
    }
}

fn log_outcome(session_id: &str, state: &SessionState) {
    match state.outcome() {
        Some(Outcome::Record(record)) => info!(
            session_id,
            risk_level = %record.risk_level(),
            risk_percentage = record.risk_percentage(),
            transactions = record.transactions_analyzed(),
            "reputation result"
        ),
        Some(Outcome::Failure(failure)) => warn!(
            session_id,
            kind = %failure.kind,
            message = failure.display_message(),
            "reputation lookup failed"
        ),
        None => debug!(session_id, phase = %state.phase(), "session state updated"),
    }
}
