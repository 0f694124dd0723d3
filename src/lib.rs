//! IRMAP - asset and risk tracking core
//!
//! The non-web core of the IRMAP risk management backend:
//!
//! - **Models**: assets, threats, the threat library, ML risk analyses and
//!   manual risk assessments
//! - **Analyzer**: client for the external ML scoring service
//! - **Session**: token-to-username registry with pluggable storage
//!
//! # Quick Start
//!
//! ```ignore
//! use irmap::{Asset, Config, MlClient, RiskAnalyzer};
//!
//! let config = Config::load(None)?;
//! let client = MlClient::new(&config.analyzer)?;
//! let report = client.analyze(&Asset::new("srv1", "server", "High")).await?;
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod observability;
pub mod session;
pub mod testing;

pub use analyzer::{MlClient, MlResponse, RawAnalysis, RiskAnalyzer};
pub use config::Config;
pub use errors::{AnalysisError, IrmapError};
pub use models::{Asset, RiskAnalysis, RiskAssessment, Threat, ThreatLibrary};
pub use session::SessionStore;
