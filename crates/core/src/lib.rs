//! # fraudscan-core
//!
//! 스캔된 코드에서 사용자 식별자를 추출하고, 평판 서비스에 조회한 뒤,
//! 결과를 화면 독립적인 심각도로 분류하는 스캔 세션의 핵심 로직입니다.
//!
//! # 구성
//! - [`extract`] -- 페이로드에서 조회 키 추출
//! - [`session`] -- 순수 상태 전이 함수 (`IDLE → LOOKING_UP → SHOWING_* → IDLE`)
//! - [`driver`] -- 상태 머신을 tokio 위에서 구동하는 [`ScanSession`]
//! - [`lookup`] -- 평판 조회 추상화 [`ReputationLookup`]
//! - [`severity`] -- 위험 등급을 표시 심각도로 변환
//! - [`config`] -- `fraudscan.toml` 로딩 및 검증

pub mod config;
pub mod driver;
pub mod error;
pub mod extract;
pub mod lookup;
pub mod metrics;
pub mod session;
pub mod severity;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, FailureKind, FraudscanError, LookupFailure, SessionError};

// 설정
pub use config::FraudscanConfig;

// 세션
pub use driver::ScanSession;
pub use session::{Effect, Outcome, Phase, SessionEvent, SessionState, Transition, transition};

// 조회
pub use lookup::{LookupResult, ReputationLookup};

// 도메인 타입
pub use extract::{encode_payload, extract};
pub use severity::{severity_of, severity_of_label};
pub use types::{DisplaySeverity, LookupKey, ReputationRecord, RiskLevel, ScanPayload};
