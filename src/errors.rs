use thiserror::Error;

/// The central error type for IRMAP.
///
/// Analyzer failures keep their own enum so callers that only talk to the
/// ML service can match on [`AnalysisError`] directly.
#[derive(Error, Debug)]
pub enum IrmapError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid risk assessment: {0}")]
    Assessment(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures of a single round trip to the ML scoring service.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to serialize asset: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Failed to reach analysis service at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode analysis response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl AnalysisError {
    /// Short machine-readable kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Serialization(_) => "serialization",
            AnalysisError::Transport { .. } => "transport",
            AnalysisError::Decode(_) => "decode",
        }
    }
}

pub type Result<T> = std::result::Result<T, IrmapError>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_ANALYSIS_ERROR: u8 = 4;

/// Determine the appropriate process exit code for an error.
pub fn get_exit_code(e: &anyhow::Error) -> u8 {
    if let Some(irmap_err) = e.downcast_ref::<IrmapError>() {
        return match irmap_err {
            IrmapError::Config(_) => EXIT_CONFIG_ERROR,
            IrmapError::Analysis(_) => EXIT_ANALYSIS_ERROR,
            _ => EXIT_ERROR,
        };
    }

    if e.downcast_ref::<AnalysisError>().is_some() {
        return EXIT_ANALYSIS_ERROR;
    }

    // Context-wrapped errors still carry the typed error in the chain
    for cause in e.chain() {
        if cause.downcast_ref::<AnalysisError>().is_some() {
            return EXIT_ANALYSIS_ERROR;
        }
        if let Some(IrmapError::Config(_)) = cause.downcast_ref::<IrmapError>() {
            return EXIT_CONFIG_ERROR;
        }
    }

    EXIT_ERROR
}
