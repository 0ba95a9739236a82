//! 평판 서비스 응답 해석
//!
//! HTTP 상태와 본문을 받아 [`LookupResult`]로 분류하는 순수 함수입니다.
//!
//! | 상태 | 본문 | 결과 |
//! |---|---|---|
//! | 2xx | 평판 레코드 | `ReputationRecord` |
//! | 2xx | `error` 필드 | "not found"를 포함하면 `NOT_FOUND`, 아니면 `UNKNOWN` |
//! | 2xx | 그 외 | `MALFORMED_RESPONSE` |
//! | 404 | 무관 | `NOT_FOUND` (`error`/`detail` 메시지) |
//! | 그 외 | 무관 | `UNKNOWN` |

use fraudscan_core::{FailureKind, LookupFailure, LookupResult, ReputationRecord, RiskLevel};
use reqwest::StatusCode;
use serde::Deserialize;

/// 성공 응답 스키마. `user_id` 같은 추가 필드는 무시합니다.
#[derive(Debug, Deserialize)]
struct WireRecord {
    risk_level: String,
    risk_percentage: f64,
    message: String,
    transactions_analyzed: u64,
}

/// 에러 응답 스키마
#[derive(Debug, Default, Deserialize)]
struct WireError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl WireError {
    fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// `error`를 우선하고, 없으면 `detail`을 문자열로 돌려줍니다.
    fn message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        match &self.detail {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }
}

/// 응답 상태와 본문을 조회 결과로 변환합니다.
pub fn resolve(status: StatusCode, body: &[u8]) -> LookupResult {
    if status.is_success() {
        return resolve_success(body);
    }

    let message = WireError::parse(body).message();
    if status == StatusCode::NOT_FOUND {
        return Err(match message {
            Some(msg) => LookupFailure::not_found(msg),
            None => LookupFailure::new(FailureKind::NotFound),
        });
    }

    let summary = match message {
        Some(msg) => format!("reputation service returned HTTP {}: {msg}", status.as_u16()),
        None => format!("reputation service returned HTTP {}", status.as_u16()),
    };
    Err(LookupFailure::unknown(summary))
}

fn resolve_success(body: &[u8]) -> LookupResult {
    if let Ok(wire) = serde_json::from_slice::<WireRecord>(body) {
        return into_record(wire);
    }

    match WireError::parse(body).error {
        Some(error) if error.to_ascii_lowercase().contains("not found") => {
            Err(LookupFailure::not_found(error))
        }
        Some(error) => Err(LookupFailure::unknown(error)),
        None => Err(LookupFailure::malformed(
            "response did not match the reputation schema",
        )),
    }
}

fn into_record(wire: WireRecord) -> LookupResult {
    let level = match wire.risk_level.as_str() {
        "LOW" => RiskLevel::Low,
        "MEDIUM" => RiskLevel::Medium,
        "HIGH" => RiskLevel::High,
        other => {
            return Err(LookupFailure::malformed(format!(
                "unknown risk level '{other}'"
            )));
        }
    };

    if !wire.risk_percentage.is_finite() {
        return Err(LookupFailure::malformed("risk percentage is not a number"));
    }

    // 범위를 벗어난 백분율은 생성자에서 [0, 100]으로 고정됨
    Ok(ReputationRecord::new(
        level,
        wire.risk_percentage,
        wire.message,
        wire.transactions_analyzed,
    ))
}
