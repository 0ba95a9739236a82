//! HTTP 평판 클라이언트
//!
//! `GET {endpoint_base}/reputation/{key}` 요청 한 번으로 평판을 조회합니다.
//! 재시도와 캐싱은 하지 않으며, 연결/요청 타임아웃으로 모든 호출이 유한 시간 안에 끝납니다.

use fraudscan_core::config::ReputationConfig;
use fraudscan_core::{LookupFailure, LookupKey, LookupResult, ReputationLookup};
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderValue};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::response;

/// reqwest 기반 평판 조회 클라이언트
///
/// 복제 비용이 낮으며 내부 커넥션 풀을 공유합니다.
#[derive(Debug, Clone)]
pub struct HttpReputationClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpReputationClient {
    /// 설정으로 클라이언트를 생성합니다.
    ///
    /// # Errors
    /// 엔드포인트가 절대 http(s) URL이 아니거나 HTTP 클라이언트를 만들 수 없으면 실패합니다.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = parse_endpoint(&config.endpoint_base)?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        debug!(
            endpoint = %base,
            request_timeout_ms = config.request_timeout.as_millis() as u64,
            connect_timeout_ms = config.connect_timeout.as_millis() as u64,
            "reputation client ready"
        );
        Ok(Self { http, base })
    }

    /// `fraudscan.toml`의 `[reputation]` 섹션으로 클라이언트를 생성합니다.
    pub fn from_config(config: &ReputationConfig) -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_core(config))
    }

    /// 서비스 기본 URL
    pub fn endpoint_base(&self) -> &Url {
        &self.base
    }

    /// 키에 대한 조회 URL을 만듭니다. 키는 하나의 경로 세그먼트로 인코딩됩니다.
    ///
    /// # Errors
    /// 빈 키와 `.`, `..`는 하나의 세그먼트로 표현할 수 없으므로 `LOCAL_VALIDATION`으로 거부합니다.
    /// URL 정규화가 `%2E`도 점 세그먼트로 취급하므로 인코딩으로 우회할 수 없습니다.
    pub fn endpoint_for(&self, key: &LookupKey) -> Result<Url, LookupFailure> {
        if key.is_empty() {
            return Err(LookupFailure::local_validation(
                "lookup key must not be empty",
            ));
        }
        if matches!(key.as_str(), "." | "..") {
            return Err(LookupFailure::local_validation(format!(
                "lookup key '{key}' is not a valid path segment"
            )));
        }

        let mut url = self.base.clone();
        // base는 생성 시점에 cannot-be-a-base가 아님을 확인함
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("reputation")
                .push(key.as_str());
        }
        Ok(url)
    }

    /// 평판을 조회합니다.
    ///
    /// 경로로 표현할 수 없는 키는 네트워크 호출 없이 거부합니다.
    pub async fn fetch(&self, key: &LookupKey) -> LookupResult {
        let url = self.endpoint_for(key)?;
        debug!(key = %key, url = %url, "requesting reputation");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| transport_failure(key, &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_failure(key, &e))?;

        debug!(key = %key, status = status.as_u16(), bytes = body.len(), "reputation response");
        response::resolve(status, &body)
    }
}

impl ReputationLookup for HttpReputationClient {
    async fn lookup(&self, key: &LookupKey) -> LookupResult {
        self.fetch(key).await
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ClientError> {
    let invalid = |reason: &str| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        reason: reason.to_owned(),
    };

    let url = Url::parse(endpoint.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("endpoint cannot carry a path"));
    }
    Ok(url)
}

fn transport_failure(key: &LookupKey, err: &reqwest::Error) -> LookupFailure {
    let reason = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "could not connect"
    } else {
        "transport error"
    };
    warn!(key = %key, error = %err, reason, "reputation request failed");
    LookupFailure::network(format!(
        "Network error: could not reach the reputation service ({reason})."
    ))
}
