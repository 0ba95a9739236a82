//! 스캔 세션 상태 머신 -- 순수 전이 함수
//!
//! [`transition`]은 현재 [`SessionState`]와 [`SessionEvent`]를 받아 다음 상태와
//! 수행할 부수 효과([`Effect`])를 돌려줍니다. 네트워크 호출이나 태스크 생성은
//! 하지 않으며, 효과의 실행은 [`ScanSession`](crate::driver::ScanSession)이 담당합니다.
//!
//! # 전이 표
//! ```text
//! IDLE ──capture(빈 키)──────────────> SHOWING_ERROR (LOCAL_VALIDATION)
//! IDLE ──capture(키 K)───────────────> LOOKING_UP   (effect: Lookup(K))
//! LOOKING_UP ──capture───────────────> LOOKING_UP   (무시)
//! LOOKING_UP ──resolved(K, Ok(R))────> SHOWING_RESULT
//! LOOKING_UP ──resolved(K, Err(F))───> SHOWING_ERROR
//! SHOWING_* ──reset──────────────────> IDLE
//! ```
//! 표에 없는 조합은 모두 상태를 바꾸지 않습니다.
//!
//! # 불변식
//! - `outcome`은 phase가 `SHOWING_RESULT` 또는 `SHOWING_ERROR`일 때만 존재합니다.
//! - `pending_key`는 phase가 `LOOKING_UP`일 때만 존재합니다.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LookupFailure;
use crate::extract::extract;
use crate::lookup::LookupResult;
use crate::types::{LookupKey, ReputationRecord, ScanPayload};

/// 세션 단계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// 캡처 대기
    #[default]
    Idle,
    /// 조회 진행 중
    LookingUp,
    /// 결과 표시 중 (사용자 리셋 대기)
    ShowingResult,
    /// 에러 표시 중 (사용자 리셋 대기)
    ShowingError,
}

impl Phase {
    /// 결과 또는 에러를 표시 중인 단계인지 확인합니다.
    pub fn is_showing(&self) -> bool {
        matches!(self, Self::ShowingResult | Self::ShowingError)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::LookingUp => write!(f, "LOOKING_UP"),
            Self::ShowingResult => write!(f, "SHOWING_RESULT"),
            Self::ShowingError => write!(f, "SHOWING_ERROR"),
        }
    }
}

/// 한 사이클의 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// 조회 성공
    Record(ReputationRecord),
    /// 조회 실패 또는 로컬 검증 실패
    Failure(LookupFailure),
}

impl Outcome {
    pub fn record(&self) -> Option<&ReputationRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&LookupFailure> {
        match self {
            Self::Record(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// 세션 상태 -- 세션마다 정확히 하나
///
/// 불변 값으로 다루며, 전이 함수가 새 값을 만들어 교체합니다.
///
/// 상태는 전이 함수로만 만들어지며 역직렬화는 제공하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    phase: Phase,
    pending_key: Option<LookupKey>,
    outcome: Option<Outcome>,
}

impl SessionState {
    /// 화면 활성화 시점의 초기 상태 (`IDLE`)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending_key(&self) -> Option<&LookupKey> {
        self.pending_key.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// 불변식을 만족하는지 확인합니다.
    pub fn is_consistent(&self) -> bool {
        let outcome_ok = self.outcome.is_some() == self.phase.is_showing();
        let key_ok = self.pending_key.is_some() == (self.phase == Phase::LookingUp);
        let kind_ok = match (&self.phase, &self.outcome) {
            (Phase::ShowingResult, Some(Outcome::Record(_))) => true,
            (Phase::ShowingError, Some(Outcome::Failure(_))) => true,
            (Phase::ShowingResult | Phase::ShowingError, _) => false,
            _ => true,
        };
        outcome_ok && key_ok && kind_ok
    }

    fn looking_up(key: LookupKey) -> Self {
        Self {
            phase: Phase::LookingUp,
            pending_key: Some(key),
            outcome: None,
        }
    }

    fn showing_result(record: ReputationRecord) -> Self {
        Self {
            phase: Phase::ShowingResult,
            pending_key: None,
            outcome: Some(Outcome::Record(record)),
        }
    }

    fn showing_error(failure: LookupFailure) -> Self {
        Self {
            phase: Phase::ShowingError,
            pending_key: None,
            outcome: Some(Outcome::Failure(failure)),
        }
    }
}

/// 상태 머신 입력 이벤트
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// 캡처 서브시스템이 코드를 디코딩함
    Capture(ScanPayload),
    /// 진행 중이던 조회가 완료됨
    LookupResolved {
        /// 조회에 사용된 키 (오래된 결과 식별용)
        key: LookupKey,
        /// 조회 결과
        result: LookupResult,
    },
    /// 사용자가 다음 스캔을 요청함
    Reset,
}

impl SessionEvent {
    /// 로깅용 이벤트 이름
    pub fn name(&self) -> &'static str {
        match self {
            Self::Capture(_) => "capture",
            Self::LookupResolved { .. } => "lookup_resolved",
            Self::Reset => "reset",
        }
    }
}

/// 전이가 요청하는 부수 효과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// 평판 서비스에 키를 조회
    Lookup(LookupKey),
}

/// 전이 결과
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// 다음 상태
    pub state: SessionState,
    /// 실행할 효과 (없으면 `None`)
    pub effect: Option<Effect>,
    /// 이벤트가 무시되었는지 여부
    pub ignored: bool,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
            ignored: false,
        }
    }

    fn with_effect(state: SessionState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
            ignored: false,
        }
    }

    fn ignore(state: &SessionState) -> Self {
        Self {
            state: state.clone(),
            effect: None,
            ignored: true,
        }
    }
}

/// 상태 전이 함수
///
/// 현재 상태를 변경하지 않고 다음 상태를 계산합니다.
pub fn transition(state: &SessionState, event: SessionEvent) -> Transition {
    let event_name = event.name();
    let next = match (state.phase, event) {
        (Phase::Idle, SessionEvent::Capture(payload)) => {
            let key = extract(&payload);
            if key.is_empty() {
                Transition::to(SessionState::showing_error(LookupFailure::local_validation(
                    "Scanned code does not contain a user id.",
                )))
            } else {
                Transition::with_effect(SessionState::looking_up(key.clone()), Effect::Lookup(key))
            }
        }
        (Phase::LookingUp, SessionEvent::LookupResolved { key, result }) => {
            if state.pending_key.as_ref() != Some(&key) {
                debug!(key = %key, "discarding stale lookup result");
                Transition::ignore(state)
            } else {
                match result {
                    Ok(record) => Transition::to(SessionState::showing_result(record)),
                    Err(failure) => Transition::to(SessionState::showing_error(failure)),
                }
            }
        }
        (Phase::ShowingResult | Phase::ShowingError, SessionEvent::Reset) => {
            Transition::to(SessionState::new())
        }
        _ => Transition::ignore(state),
    };

    debug!(
        event = event_name,
        from = %state.phase,
        to = %next.state.phase,
        ignored = next.ignored,
        "session transition"
    );
    debug_assert!(next.state.is_consistent());
    next
}
