//! Unit tests for the analyzer module
//!
//! Tests cover:
//! - Raw and typed decoding against the mock scoring service
//! - Error kinds for unreachable services and bad bodies
//! - Substituting a test double through `RiskAnalyzer`

use async_trait::async_trait;
use irmap::analyzer::{score_asset, MlClient, MlResponse, RawAnalysis, RiskAnalyzer};
use irmap::config::AnalyzerConfig;
use irmap::errors::AnalysisError;
use irmap::models::Asset;
use irmap::testing::mock_analyzer::MockAnalyzerServer;
use std::sync::atomic::{AtomicUsize, Ordering};

const SRV1: &str =
    r#"{"asset":"srv1","risk_level":"high","risk_score":8.2,"recommendation":"patch now"}"#;

fn srv1() -> Asset {
    let mut asset = Asset::new("srv1", "server", "High");
    asset.id = 1;
    asset
}

// ============================================================================
// Mock service round trips
// ============================================================================

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn test_mapping_holds_exact_values() {
        let server = MockAnalyzerServer::builder().with_json(SRV1).build().await;
        let config = AnalyzerConfig {
            endpoint: server.url().to_string(),
            ..Default::default()
        };
        let client = MlClient::new(&config).unwrap();

        let raw = client.analyze_raw(&srv1()).await.unwrap();
        let expected: RawAnalysis = serde_json::from_str(SRV1).unwrap();
        assert_eq!(raw, expected);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_raw_and_typed_agree() {
        let server = MockAnalyzerServer::builder().with_json(SRV1).build().await;
        let client = MlClient::with_url(server.analyze_url());

        let raw = client.analyze_raw(&srv1()).await.unwrap();
        let typed = client.analyze(&srv1()).await.unwrap();
        assert_eq!(MlResponse::from_raw(raw).unwrap(), typed);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_one_request_per_call() {
        let server = MockAnalyzerServer::builder()
            .with_body(503, "unavailable")
            .build()
            .await;
        let client = MlClient::with_url(server.analyze_url());

        assert!(client.analyze_raw(&srv1()).await.is_err());
        assert_eq!(server.requests().await.len(), 1);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/analyze", listener.local_addr().unwrap());
        drop(listener);

        let err = MlClient::with_url(url)
            .analyze(&srv1())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "transport");
    }

    #[tokio::test]
    async fn test_plain_text_is_decode() {
        let server = MockAnalyzerServer::builder()
            .with_body(200, "risk: high")
            .build()
            .await;
        let err = MlClient::with_url(server.analyze_url())
            .analyze_raw(&srv1())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "decode");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_empty_body_is_decode() {
        let server = MockAnalyzerServer::builder().with_body(200, "").build().await;
        let err = MlClient::with_url(server.analyze_url())
            .analyze_raw(&srv1())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
        server.stop().await;
    }
}

// ============================================================================
// Test doubles through the trait
// ============================================================================

mod trait_tests {
    use super::*;

    struct FixedAnalyzer {
        calls: AtomicUsize,
        score: f64,
    }

    #[async_trait]
    impl RiskAnalyzer for FixedAnalyzer {
        async fn analyze_raw(&self, asset: &Asset) -> Result<RawAnalysis, AnalysisError> {
            let resp = self.analyze(asset).await?;
            match serde_json::to_value(resp).map_err(AnalysisError::Decode)? {
                serde_json::Value::Object(map) => Ok(map),
                _ => unreachable!("MlResponse serializes to an object"),
            }
        }

        async fn analyze(&self, asset: &Asset) -> Result<MlResponse, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MlResponse {
                asset: asset.name.clone(),
                risk_level: "medium".to_string(),
                risk_score: self.score,
                recommendation: "monitor".to_string(),
                extra: Default::default(),
            })
        }
    }

    struct BrokenAnalyzer;

    #[async_trait]
    impl RiskAnalyzer for BrokenAnalyzer {
        async fn analyze_raw(&self, _asset: &Asset) -> Result<RawAnalysis, AnalysisError> {
            Err(AnalysisError::Decode(
                serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            ))
        }

        async fn analyze(&self, asset: &Asset) -> Result<MlResponse, AnalysisError> {
            let raw = self.analyze_raw(asset).await?;
            MlResponse::from_raw(raw).map_err(AnalysisError::Decode)
        }
    }

    #[tokio::test]
    async fn test_score_asset_with_double() {
        let analyzer = FixedAnalyzer {
            calls: AtomicUsize::new(0),
            score: 4.5,
        };
        let analysis = score_asset(&analyzer, &srv1()).await.unwrap();
        assert_eq!(analysis.asset_id(), 1);
        assert!((analysis.risk_score() - 4.5).abs() < f64::EPSILON);
        assert_eq!(analysis.description(), "medium: monitor");
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_score_asset_propagates_error() {
        let err = score_asset(&BrokenAnalyzer, &srv1()).await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn test_double_raw_mapping_has_documented_keys() {
        let analyzer = FixedAnalyzer {
            calls: AtomicUsize::new(0),
            score: 1.0,
        };
        let raw = analyzer.analyze_raw(&srv1()).await.unwrap();
        for key in ["asset", "risk_level", "risk_score", "recommendation"] {
            assert!(raw.contains_key(key), "missing {}", key);
        }
    }
}
