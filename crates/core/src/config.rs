//! 설정 관리 -- fraudscan.toml 파싱 및 런타임 설정
//!
//! [`FraudscanConfig`]는 로깅, 평판 서비스, 세션 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`FRAUDSCAN_REPUTATION_ENDPOINT_BASE=https://...` 형식)
//! 3. 설정 파일 (`fraudscan.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), fraudscan_core::error::FraudscanError> {
//! use fraudscan_core::config::FraudscanConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = FraudscanConfig::load("fraudscan.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = FraudscanConfig::parse("[reputation]\nendpoint_base = \"https://risk.example\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, FraudscanError};

/// 타임아웃 허용 범위 (초)
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=300;

/// Fraudscan 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FraudscanConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 평판 서비스 설정
    #[serde(default)]
    pub reputation: ReputationConfig,
    /// 스캔 세션 설정
    #[serde(default)]
    pub session: SessionConfig,
}

impl FraudscanConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FraudscanError> {
        let mut config = Self::read(path.as_ref()).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    async fn read(path: &Path) -> Result<Self, FraudscanError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FraudscanError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                FraudscanError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, FraudscanError> {
        toml::from_str(toml_str).map_err(|e| {
            FraudscanError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `FRAUDSCAN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "FRAUDSCAN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "FRAUDSCAN_GENERAL_LOG_FORMAT");

        override_string(
            &mut self.reputation.endpoint_base,
            "FRAUDSCAN_REPUTATION_ENDPOINT_BASE",
        );
        override_u64(
            &mut self.reputation.request_timeout_secs,
            "FRAUDSCAN_REPUTATION_REQUEST_TIMEOUT_SECS",
        );
        override_u64(
            &mut self.reputation.connect_timeout_secs,
            "FRAUDSCAN_REPUTATION_CONNECT_TIMEOUT_SECS",
        );
        override_string(
            &mut self.reputation.user_agent,
            "FRAUDSCAN_REPUTATION_USER_AGENT",
        );

        override_bool(
            &mut self.session.permission_granted,
            "FRAUDSCAN_SESSION_PERMISSION_GRANTED",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), FraudscanError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        self.reputation.validate()
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> FraudscanError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 평판 서비스 설정
///
/// 클라이언트는 이 값을 생성 시점에 주입받습니다. 전역 상태로 읽지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// 서비스 기본 URL (`{endpoint_base}/reputation/{key}`로 조회)
    pub endpoint_base: String,
    /// 요청 전체 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            endpoint_base: "http://127.0.0.1:8000".to_owned(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: format!("fraudscan/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ReputationConfig {
    /// 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 연결 타임아웃
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// 평판 서비스 설정을 검증합니다.
    pub fn validate(&self) -> Result<(), FraudscanError> {
        let endpoint = self.endpoint_base.trim();
        if endpoint.is_empty() {
            return Err(invalid(
                "reputation.endpoint_base",
                "endpoint_base must not be empty",
            ));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(invalid(
                "reputation.endpoint_base",
                "endpoint_base must start with http:// or https://",
            ));
        }

        for (field, value) in [
            ("reputation.request_timeout_secs", self.request_timeout_secs),
            ("reputation.connect_timeout_secs", self.connect_timeout_secs),
        ] {
            if !TIMEOUT_RANGE_SECS.contains(&value) {
                return Err(invalid(
                    field,
                    format!(
                        "must be between {} and {} seconds",
                        TIMEOUT_RANGE_SECS.start(),
                        TIMEOUT_RANGE_SECS.end()
                    ),
                ));
            }
        }

        if self.connect_timeout_secs > self.request_timeout_secs {
            return Err(invalid(
                "reputation.connect_timeout_secs",
                "must not exceed request_timeout_secs",
            ));
        }

        Ok(())
    }
}

/// 스캔 세션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 시작 시 캡처 권한 허용 여부
    pub permission_granted: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            permission_granted: true,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = FraudscanConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.reputation.endpoint_base, "http://127.0.0.1:8000");
        assert_eq!(config.reputation.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.reputation.connect_timeout(), Duration::from_secs(5));
        assert!(config.reputation.user_agent.starts_with("fraudscan/"));
        assert!(config.session.permission_granted);
    }

    #[test]
    fn default_config_passes_validation() {
        FraudscanConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = FraudscanConfig::parse("").unwrap();
        assert_eq!(config.reputation.request_timeout_secs, 10);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[reputation]
endpoint_base = "https://risk.example.com/api"
"#;
        let config = FraudscanConfig::parse(toml).unwrap();
        assert_eq!(config.reputation.endpoint_base, "https://risk.example.com/api");
        // 나머지는 기본값 유지
        assert_eq!(config.reputation.connect_timeout_secs, 5);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[general]
log_level = "debug"
log_format = "json"

[reputation]
endpoint_base = "https://risk.internal:8443"
request_timeout_secs = 20
connect_timeout_secs = 3
user_agent = "kiosk-7"

[session]
permission_granted = false
"#;
        let config = FraudscanConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.reputation.request_timeout_secs, 20);
        assert_eq!(config.reputation.user_agent, "kiosk-7");
        assert!(!config.session.permission_granted);
        config.validate().unwrap();
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = FraudscanConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            FraudscanError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = FraudscanConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = FraudscanConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_empty_endpoint() {
        let mut config = FraudscanConfig::default();
        config.reputation.endpoint_base = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("endpoint_base"));
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let mut config = FraudscanConfig::default();
        config.reputation.endpoint_base = "ftp://risk.example".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn validate_rejects_out_of_range_timeouts() {
        let mut config = FraudscanConfig::default();
        config.reputation.request_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));

        let mut config = FraudscanConfig::default();
        config.reputation.request_timeout_secs = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_connect_longer_than_request() {
        let mut config = FraudscanConfig::default();
        config.reputation.request_timeout_secs = 5;
        config.reputation.connect_timeout_secs = 6;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_FRAUDSCAN_STR", "overridden") };
        override_string(&mut val, "TEST_FRAUDSCAN_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_FRAUDSCAN_STR") };
    }

    #[test]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_FRAUDSCAN_BOOL_BAD", "nope") };
        override_bool(&mut val, "TEST_FRAUDSCAN_BOOL_BAD");
        assert!(val);
        unsafe { std::env::remove_var("TEST_FRAUDSCAN_BOOL_BAD") };
    }

    #[test]
    fn env_override_u64_invalid_keeps_original() {
        let mut val = 10;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_FRAUDSCAN_U64_BAD", "-3") };
        override_u64(&mut val, "TEST_FRAUDSCAN_U64_BAD");
        assert_eq!(val, 10);
        unsafe { std::env::remove_var("TEST_FRAUDSCAN_U64_BAD") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_FRAUDSCAN_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = FraudscanConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = FraudscanConfig::parse(&toml_str).unwrap();
        assert_eq!(config.reputation.endpoint_base, parsed.reputation.endpoint_base);
        assert_eq!(
            config.session.permission_granted,
            parsed.session.permission_granted
        );
    }

    #[tokio::test]
    async fn load_not_found() {
        let err = FraudscanConfig::load("/nonexistent/path/fraudscan.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FraudscanError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
