//! 클라이언트 설정

use std::time::Duration;

use fraudscan_core::config::ReputationConfig;

/// 평판 클라이언트 설정
///
/// 파일 설정은 초 단위지만, 여기서는 [`Duration`]을 그대로 받습니다.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 서비스 기본 URL
    pub endpoint_base: String,
    /// 요청 전체 타임아웃
    pub request_timeout: Duration,
    /// 연결 타임아웃
    pub connect_timeout: Duration,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl ClientConfig {
    /// 기본 타임아웃으로 설정을 생성합니다.
    pub fn new(endpoint_base: impl Into<String>) -> Self {
        Self {
            endpoint_base: endpoint_base.into(),
            ..Self::from_core(&ReputationConfig::default())
        }
    }

    /// `fraudscan.toml`의 `[reputation]` 섹션에서 설정을 만듭니다.
    pub fn from_core(config: &ReputationConfig) -> Self {
        Self {
            endpoint_base: config.endpoint_base.clone(),
            request_timeout: config.request_timeout(),
            connect_timeout: config.connect_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// 요청 타임아웃을 지정합니다.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// 연결 타임아웃을 지정합니다.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
