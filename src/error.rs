use thiserror::Error;

/// Failure of a single chart load or surface operation.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no endpoint configured for chart {0}")]
    MissingEndpoint(String),

    #[error("unknown chart identifier {0}")]
    UnknownChart(String),

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned a body that is not JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected payload for {chart}: {reason}")]
    Payload { chart: String, reason: String },

    #[error("no rendering target mounted for {0}")]
    MissingTarget(String),

    #[error("surface io for {id}: {source}")]
    SurfaceIo {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

impl DashboardError {
    pub fn payload(chart: &str, reason: impl Into<String>) -> Self {
        DashboardError::Payload {
            chart: chart.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
