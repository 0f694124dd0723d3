//! ML risk-analysis client
//!
//! Posts an asset as JSON to the scoring service and decodes the reply.
//! One request per call: no retry, and no timeout unless one is configured.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod types;

pub use types::{MlResponse, RawAnalysis};

use crate::config::AnalyzerConfig;
use crate::errors::AnalysisError;
use crate::models::{Asset, RiskAnalysis};

/// Trait abstraction over the scoring service, enabling test doubles.
#[async_trait]
pub trait RiskAnalyzer: Send + Sync {
    /// Score an asset and return the response body as an untyped JSON object.
    async fn analyze_raw(&self, asset: &Asset) -> Result<RawAnalysis, AnalysisError>;

    /// Score an asset and decode the response against [`MlResponse`].
    async fn analyze(&self, asset: &Asset) -> Result<MlResponse, AnalysisError>;
}

/// HTTP client for the ML scoring service
#[derive(Debug, Clone)]
pub struct MlClient {
    client: Client,
    url: String,
}

impl MlClient {
    pub fn new(config: &AnalyzerConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: config.url(),
        })
    }

    /// Client posting to an explicit URL, with no timeout.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post any serializable asset and decode the reply as a JSON object.
    pub async fn analyze_value<T>(&self, asset: &T) -> Result<RawAnalysis, AnalysisError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let body = self.post(asset).await?;
        serde_json::from_slice(&body).map_err(AnalysisError::Decode)
    }

    /// Post any serializable asset and decode the reply against [`MlResponse`].
    pub async fn analyze_typed<T>(&self, asset: &T) -> Result<MlResponse, AnalysisError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let body = self.post(asset).await?;
        let response: MlResponse =
            serde_json::from_slice(&body).map_err(AnalysisError::Decode)?;
        info!(
            asset = %response.asset,
            risk_level = %response.risk_level,
            risk_score = response.risk_score,
            "Asset scored"
        );
        Ok(response)
    }

    /// One POST round trip; returns the full response body.
    async fn post<T>(&self, asset: &T) -> Result<Vec<u8>, AnalysisError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let payload = serde_json::to_vec(asset).map_err(AnalysisError::Serialization)?;

        debug!("Posting {} byte asset to {}", payload.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|source| AnalysisError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            // The body is still decoded; the service may encode its error as JSON
            warn!("Analysis service at {} answered {}", self.url, status);
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| AnalysisError::Transport {
                url: self.url.clone(),
                source,
            })?;

        debug!("Analysis response body ({} bytes)", body.len());
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RiskAnalyzer for MlClient {
    async fn analyze_raw(&self, asset: &Asset) -> Result<RawAnalysis, AnalysisError> {
        self.analyze_value(asset).await
    }

    async fn analyze(&self, asset: &Asset) -> Result<MlResponse, AnalysisError> {
        self.analyze_typed(asset).await
    }
}

/// Score `asset` and build the [`RiskAnalysis`] record for it.
pub async fn score_asset(
    analyzer: &dyn RiskAnalyzer,
    asset: &Asset,
) -> Result<RiskAnalysis, AnalysisError> {
    let response = analyzer.analyze(asset).await.inspect_err(|e| {
        warn!(asset_id = asset.id, kind = e.kind(), "Risk analysis failed: {}", e);
    })?;
    Ok(response.into_risk_analysis(asset.id))
}
