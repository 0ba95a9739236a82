//! 식별자 추출기 -- 스캔 페이로드를 조회 키로 변환
//!
//! 사용자 코드는 `USER_ID|{id}` 형식으로 발급됩니다. 이 접두어가 없는
//! 페이로드는 그대로 조회 키로 사용합니다.

use crate::types::{LookupKey, ScanPayload};

/// 사용자 식별자 페이로드의 구분자
pub const USER_ID_DELIMITER: &str = "USER_ID|";

/// 페이로드에서 조회 키를 추출합니다.
///
/// 구분자가 있으면 첫 번째 구분자 뒤의 모든 문자열, 없으면 페이로드 전체가 키가 됩니다.
/// 실패하지 않는 전함수이며, `"USER_ID|"`처럼 구분자 뒤가 비어 있으면 빈 키를 돌려줍니다.
pub fn extract(payload: &ScanPayload) -> LookupKey {
    let raw = payload.as_str();
    match raw.split_once(USER_ID_DELIMITER) {
        Some((_, rest)) => LookupKey::new(rest),
        None => LookupKey::new(raw),
    }
}

/// 사용자 식별자를 코드 페이로드 형식으로 인코딩합니다.
///
/// `extract(&encode_payload(id))`는 항상 `id`를 돌려줍니다.
pub fn encode_payload(user_id: &str) -> ScanPayload {
    ScanPayload::new(format!("{USER_ID_DELIMITER}{user_id}"))
}
