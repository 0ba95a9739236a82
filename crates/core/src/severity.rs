//! 표시 매퍼 -- 위험 등급을 화면 독립적인 표시 심각도로 변환

use crate::types::{DisplaySeverity, RiskLevel};

/// 위험 등급의 표시 심각도를 반환합니다.
///
/// HIGH는 critical, MEDIUM은 warning, LOW는 nominal입니다.
pub fn severity_of(level: RiskLevel) -> DisplaySeverity {
    match level {
        RiskLevel::High => DisplaySeverity::Critical,
        RiskLevel::Medium => DisplaySeverity::Warning,
        RiskLevel::Low => DisplaySeverity::Nominal,
    }
}

/// 원시 등급 문자열의 표시 심각도를 반환합니다.
///
/// 알 수 없는 등급은 LOW와 같은 nominal로 처리합니다.
pub fn severity_of_label(raw: &str) -> DisplaySeverity {
    RiskLevel::from_str_loose(raw)
        .map(severity_of)
        .unwrap_or_default()
}

impl From<RiskLevel> for DisplaySeverity {
    fn from(level: RiskLevel) -> Self {
        severity_of(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_level() {
        assert_eq!(severity_of(RiskLevel::High), DisplaySeverity::Critical);
        assert_eq!(severity_of(RiskLevel::Medium), DisplaySeverity::Warning);
        assert_eq!(severity_of(RiskLevel::Low), DisplaySeverity::Nominal);
    }

    #[test]
    fn unknown_label_fails_open_to_nominal() {
        assert_eq!(severity_of_label("SEVERE"), DisplaySeverity::Nominal);
        assert_eq!(severity_of_label(""), DisplaySeverity::Nominal);
        assert_eq!(severity_of_label("HIGH"), severity_of(RiskLevel::High));
    }

    #[test]
    fn unknown_label_matches_low() {
        assert_eq!(severity_of_label("???"), severity_of(RiskLevel::Low));
    }

    #[test]
    fn from_impl_agrees() {
        assert_eq!(
            DisplaySeverity::from(RiskLevel::Medium),
            DisplaySeverity::Warning
        );
    }
}
