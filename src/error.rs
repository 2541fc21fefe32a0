#[derive(Debug, thiserror::Error)]
pub enum PaddockError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("No release available for platform: {0}")]
    NoRelease(String),

    #[error("Release data unavailable")]
    NoData,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PaddockError>;

impl axum::response::IntoResponse for PaddockError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match &self {
            PaddockError::UnknownPlatform(_) | PaddockError::InvalidVersion(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            PaddockError::VersionNotFound(_) | PaddockError::NoRelease(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            PaddockError::NoData => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
