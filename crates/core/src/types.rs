//! 도메인 타입 -- 스캔 페이로드, 조회 키, 평판 레코드
//!
//! 캡처 서브시스템이 넘겨준 문자열부터 평판 서비스의 판정 결과까지
//! 세션 전체에서 주고받는 값들을 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 캡처 서브시스템이 디코딩한 원시 문자열
///
/// 캡처 이벤트마다 생성되어 곧바로 식별자 추출기에 소비됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPayload(String);

impl ScanPayload {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScanPayload {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ScanPayload {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// 평판 서비스 조회에 사용하는 정규화된 식별자
///
/// 추출기는 빈 키를 만들 수 있습니다. 빈 키로는 절대 조회하지 않으며,
/// 상태 머신이 이를 로컬 검증 실패로 처리합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupKey(String);

impl LookupKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 위험 등급
///
/// `Ord` 구현으로 등급 비교가 가능합니다 (`Low < Medium < High`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// 거래 이력이 깨끗함
    Low,
    /// 일부 거래가 의심스러움
    Medium,
    /// 사기 확률이 매우 높은 거래가 있음
    High,
}

impl RiskLevel {
    /// 문자열에서 위험 등급을 파싱합니다.
    ///
    /// 앞뒤 공백과 대소문자를 무시합니다. 알 수 없는 등급이면 `None`입니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" | "MED" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// 위험 비율의 하한
pub const RISK_PERCENTAGE_MIN: f64 = 0.0;
/// 위험 비율의 상한
pub const RISK_PERCENTAGE_MAX: f64 = 100.0;

/// 평판 조회 성공 결과
///
/// 생성 이후 변경할 수 없도록 필드를 숨기고 접근자만 노출합니다.
/// 위험 비율은 생성 시 `[0, 100]` 범위로 클램프됩니다. 역직렬화도 [`ReputationRecord::new`]를 거칩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordFields")]
pub struct ReputationRecord {
    risk_level: RiskLevel,
    risk_percentage: f64,
    message: String,
    transactions_analyzed: u64,
}

#[derive(Deserialize)]
struct RecordFields {
    risk_level: RiskLevel,
    risk_percentage: f64,
    message: String,
    transactions_analyzed: u64,
}

impl From<RecordFields> for ReputationRecord {
    fn from(fields: RecordFields) -> Self {
        Self::new(
            fields.risk_level,
            fields.risk_percentage,
            fields.message,
            fields.transactions_analyzed,
        )
    }
}

impl ReputationRecord {
    /// 새 레코드를 생성합니다.
    ///
    /// 범위를 벗어난 `risk_percentage`는 거부하지 않고 가까운 경계값으로 클램프합니다.
    /// 유한하지 않은 값(NaN, 무한대)은 호출자가 먼저 걸러야 합니다.
    pub fn new(
        risk_level: RiskLevel,
        risk_percentage: f64,
        message: impl Into<String>,
        transactions_analyzed: u64,
    ) -> Self {
        Self {
            risk_level,
            risk_percentage: clamp_percentage(risk_percentage),
            message: message.into(),
            transactions_analyzed,
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn risk_percentage(&self) -> f64 {
        self.risk_percentage
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn transactions_analyzed(&self) -> u64 {
        self.transactions_analyzed
    }
}

impl fmt::Display for ReputationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} RISK {}% ({} transactions analyzed)",
            self.risk_level, self.risk_percentage, self.transactions_analyzed,
        )
    }
}

/// 위험 비율을 `[0, 100]` 범위로 클램프합니다.
pub fn clamp_percentage(value: f64) -> f64 {
    value.clamp(RISK_PERCENTAGE_MIN, RISK_PERCENTAGE_MAX)
}

/// 화면 독립적인 표시 심각도
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySeverity {
    /// 평상 표시
    #[default]
    Nominal,
    /// 주의 표시
    Warning,
    /// 경고 표시
    Critical,
}

impl fmt::Display for DisplaySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominal => write!(f, "nominal"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}
