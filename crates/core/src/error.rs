//! 에러 타입 -- 도메인별 에러 정의
//!
//! [`FraudscanError`]는 설정 로딩, 세션 구동 등 실패를 호출자에게 전파하는 최상위 에러입니다.
//! [`LookupFailure`]는 성격이 다릅니다. 조회 실패는 세션 상태에 저장되어 화면에
//! 표시되는 값이므로 `Clone`, `PartialEq`, `Serialize`를 함께 구현합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fraudscan 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum FraudscanError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 세션 구동 에러
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// 평판 클라이언트 구성 에러
    #[error("client error: {0}")]
    Client(String),

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

/// 세션 구동 에러
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// 카메라 권한이 없어 캡처를 받을 수 없음
    #[error("capture permission denied")]
    PermissionDenied,

    /// 조회 대기 중이 아닌데 결과를 기다림
    #[error("no lookup in flight (phase: {phase})")]
    NothingInFlight { phase: String },
}

/// 조회 실패 분류
///
/// 모든 분류는 현재 스캔 사이클에서 종결적이며 자동 재시도하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// 추출된 키가 비어 있음 (네트워크 호출 없음)
    LocalValidation,
    /// 전송 계층 실패 (연결 불가, 타임아웃, 연결 리셋)
    Network,
    /// 서비스가 알 수 없는 식별자라고 응답함
    NotFound,
    /// 응답이 스키마를 위반함
    MalformedResponse,
    /// 분류되지 않은 실패
    Unknown,
}

impl FailureKind {
    /// 메트릭 레이블용 고정 문자열을 반환합니다.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::LocalValidation => "local_validation",
            Self::Network => "network",
            Self::NotFound => "not_found",
            Self::MalformedResponse => "malformed_response",
            Self::Unknown => "unknown",
        }
    }

    /// 메시지가 없을 때 사용자에게 보여줄 기본 문구
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::LocalValidation => "Scanned code does not contain a user id.",
            Self::Network => "Network error: could not reach the reputation service.",
            Self::NotFound => "User id not found in transaction history.",
            Self::MalformedResponse => "Reputation service returned an unexpected response.",
            Self::Unknown => "Reputation lookup failed.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalValidation => write!(f, "LOCAL_VALIDATION"),
            Self::Network => write!(f, "NETWORK"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::MalformedResponse => write!(f, "MALFORMED_RESPONSE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// 조회 실패 -- 실패 분류와 선택적인 설명 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFailure {
    /// 실패 분류
    pub kind: FailureKind,
    /// 사람이 읽을 수 있는 설명
    pub message: Option<String>,
}

impl LookupFailure {
    /// 메시지 없이 실패를 생성합니다.
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// 메시지를 포함한 실패를 생성합니다.
    pub fn with_message(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn local_validation(message: impl Into<String>) -> Self {
        Self::with_message(FailureKind::LocalValidation, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::with_message(FailureKind::Network, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(FailureKind::NotFound, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::with_message(FailureKind::MalformedResponse, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::with_message(FailureKind::Unknown, message)
    }

    /// 에러 카드에 표시할 메시지. 메시지가 없으면 분류별 기본 문구를 사용합니다.
    pub fn display_message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.display_message())
    }
}

impl std::error::Error for LookupFailure {}
