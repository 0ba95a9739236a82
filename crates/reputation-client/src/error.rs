//! 클라이언트 에러 타입
//!
//! 조회 자체의 실패는 [`LookupFailure`](fraudscan_core::LookupFailure) 값으로 표현되며,
//! 여기서는 클라이언트를 만들 수 없는 경우만 다룹니다.

use fraudscan_core::error::FraudscanError;

/// 평판 클라이언트 생성 에러
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP 클라이언트 빌드 실패 (TLS 백엔드 초기화 등)
    #[error("failed to build http client: {0}")]
    Build(String),

    /// 엔드포인트 URL이 올바르지 않음
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// 입력된 엔드포인트
        endpoint: String,
        /// 실패 사유
        reason: String,
    },
}

impl From<ClientError> for FraudscanError {
    fn from(err: ClientError) -> Self {
        FraudscanError::Client(err.to_string())
    }
}
