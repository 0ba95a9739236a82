//! 통합 테스트 -- 로컬 평판 서비스에 대한 HTTP 조회
//!
//! 127.0.0.1의 임의 포트에 axum 서버를 띄우고 실제 HTTP 왕복으로
//! 응답 분류, 타임아웃, 경로 인코딩, 세션 연동을 검증합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use fraudscan_core::{
    DisplaySeverity, FailureKind, LookupKey, Outcome, Phase, ReputationLookup, RiskLevel,
    ScanSession, severity_of,
};
use fraudscan_reputation_client::{ClientConfig, HttpReputationClient};
use serde_json::json;

// Local reputation service for integration tests
mod service {
    use super::*;

    /// 사용자 ID에 따라 응답을 바꾸는 테스트 서비스
    pub async fn reputation(Path(user_id): Path<String>) -> axum::response::Response {
        match user_id.as_str() {
            "abc123" => Json(json!({
                "user_id": "abc123",
                "risk_level": "HIGH",
                "risk_percentage": 87.0,
                "message": "Suspicious pattern",
                "transactions_analyzed": 42
            }))
            .into_response(),
            "over" => record("MEDIUM", 150.0),
            "under" => record("LOW", -5.0),
            "weird" => record("SEVERE", 50.0),
            "garbage" => (StatusCode::OK, "not json at all").into_response(),
            "boom" => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Model or preprocessor not loaded."})),
            )
                .into_response(),
            "soft-missing" => Json(json!({"error": "User ID not found."})).into_response(),
            // 그 외 ID는 경로 디코딩 결과를 그대로 메시지로 돌려줌
            other if other.contains(' ') || other.contains('/') => Json(json!({
                "risk_level": "LOW",
                "risk_percentage": 1.0,
                "message": other,
                "transactions_analyzed": 1
            }))
            .into_response(),
            other => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "detail": format!("User ID '{other}' not found in transaction history.")
                })),
            )
                .into_response(),
        }
    }

    fn record(level: &str, percentage: f64) -> axum::response::Response {
        Json(json!({
            "risk_level": level,
            "risk_percentage": percentage,
            "message": "generated",
            "transactions_analyzed": 3
        }))
        .into_response()
    }

    pub async fn slow(Path(_user_id): Path<String>) -> axum::response::Response {
        tokio::time::sleep(Duration::from_secs(5)).await;
        record("LOW", 1.0)
    }

    pub fn router() -> Router {
        Router::new().route("/reputation/{user_id}", get(reputation))
    }

    pub fn slow_router() -> Router {
        Router::new().route("/reputation/{user_id}", get(slow))
    }
}

async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

async fn client_for(app: Router) -> HttpReputationClient {
    let addr = spawn_server(app).await;
    HttpReputationClient::new(ClientConfig::new(format!("http://{addr}"))).expect("client")
}

// =============================================================================
// 응답 분류
// =============================================================================

#[tokio::test]
async fn success_returns_record() {
    let client = client_for(service::router()).await;

    let record = client
        .lookup(&LookupKey::new("abc123"))
        .await
        .expect("record");

    assert_eq!(record.risk_level(), RiskLevel::High);
    assert_eq!(record.risk_percentage(), 87.0);
    assert_eq!(record.message(), "Suspicious pattern");
    assert_eq!(record.transactions_analyzed(), 42);
}

#[tokio::test]
async fn unknown_user_is_not_found_with_detail() {
    let client = client_for(service::router()).await;

    let err = client.lookup(&LookupKey::new("U-404")).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::NotFound);
    assert!(err.display_message().contains("U-404"));
}

#[tokio::test]
async fn error_field_on_success_status_is_not_found() {
    let client = client_for(service::router()).await;
    let err = client
        .lookup(&LookupKey::new("soft-missing"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::NotFound);
}

#[tokio::test]
async fn unknown_risk_level_is_malformed() {
    let client = client_for(service::router()).await;
    let err = client.lookup(&LookupKey::new("weird")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn out_of_range_percentages_are_clamped() {
    let client = client_for(service::router()).await;

    let over = client.lookup(&LookupKey::new("over")).await.expect("over");
    let under = client.lookup(&LookupKey::new("under")).await.expect("under");

    assert_eq!(over.risk_percentage(), 100.0);
    assert_eq!(under.risk_percentage(), 0.0);
}

#[tokio::test]
async fn invalid_json_is_malformed() {
    let client = client_for(service::router()).await;
    let err = client.lookup(&LookupKey::new("garbage")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn server_error_is_unknown() {
    let client = client_for(service::router()).await;
    let err = client.lookup(&LookupKey::new("boom")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Unknown);
    assert!(err.display_message().contains("500"));
}

// =============================================================================
// 전송 실패
// =============================================================================

#[tokio::test]
async fn closed_port_is_network_failure() {
    // Given: 바인딩 후 바로 닫은 포트
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        listener.local_addr().expect("addr")
    };
    let client = HttpReputationClient::new(
        ClientConfig::new(format!("http://{addr}")).connect_timeout(Duration::from_secs(1)),
    )
    .expect("client");

    // When
    let err = client.lookup(&LookupKey::new("abc123")).await.unwrap_err();

    // Then
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn slow_server_times_out_as_network_failure() {
    let addr = spawn_server(service::slow_router()).await;
    let client = HttpReputationClient::new(
        ClientConfig::new(format!("http://{addr}"))
            .request_timeout(Duration::from_millis(200))
            .connect_timeout(Duration::from_millis(200)),
    )
    .expect("client");

    let started = std::time::Instant::now();
    let err = client.lookup(&LookupKey::new("abc123")).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Network);
    assert!(err.display_message().contains("timed out"));
    assert!(
        started.elapsed() < Duration::from_secs(4),
        "lookup should be bounded by the request timeout"
    );
}

// =============================================================================
// 경로 인코딩
// =============================================================================

#[tokio::test]
async fn key_with_slash_and_space_is_one_path_segment() {
    let client = client_for(service::router()).await;

    let record = client
        .lookup(&LookupKey::new("team a/42"))
        .await
        .expect("record");

    // 서버가 디코딩한 경로 파라미터가 원래 키와 같음
    assert_eq!(record.message(), "team a/42");
}

#[tokio::test]
async fn endpoint_base_path_prefix_is_kept() {
    let addr = spawn_server(Router::new().nest("/api/v1", service::router())).await;
    let client = HttpReputationClient::new(ClientConfig::new(format!("http://{addr}/api/v1/")))
        .expect("client");

    let record = client
        .lookup(&LookupKey::new("abc123"))
        .await
        .expect("record");
    assert_eq!(record.risk_level(), RiskLevel::High);
}

// =============================================================================
// 세션 연동
// =============================================================================

#[tokio::test]
async fn session_cycle_over_http() {
    let client = client_for(service::router()).await;
    let mut session = ScanSession::new(Arc::new(client));

    let state = session.scan("USER_ID|abc123").await.expect("scan");
    assert_eq!(state.phase(), Phase::ShowingResult);
    let record = state.outcome().and_then(Outcome::record).expect("record");
    assert_eq!(severity_of(record.risk_level()), DisplaySeverity::Critical);

    session.reset();
    let state = session.scan("USER_ID|nobody").await.expect("scan");
    assert_eq!(state.phase(), Phase::ShowingError);
    let failure = state.outcome().and_then(Outcome::failure).expect("failure");
    assert_eq!(failure.kind, FailureKind::NotFound);
}
