//! # fraudscan-reputation-client
//!
//! 외부 평판 서비스에 대한 HTTP 구현입니다.
//! [`HttpReputationClient`]는 [`fraudscan_core::ReputationLookup`]을 구현하므로
//! [`fraudscan_core::ScanSession`]에 그대로 주입할 수 있습니다.
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use fraudscan_core::ScanSession;
//! use fraudscan_reputation_client::{ClientConfig, HttpReputationClient};
//!
//! let client = HttpReputationClient::new(ClientConfig::new("https://risk.example.com"))?;
//! let mut session = ScanSession::new(Arc::new(client));
//! let state = session.scan("USER_ID|U-1001").await?;
//! println!("{:?}", state.phase());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::HttpReputationClient;
pub use config::ClientConfig;
pub use error::ClientError;
