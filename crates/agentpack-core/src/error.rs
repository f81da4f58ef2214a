use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("missing section '{section}' listed in {artifact}/_order.yaml")]
    MissingSection { artifact: String, section: String },

    #[error("invalid artifact name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidName(String),

    #[error("invalid output path '{0}': must be relative, forward-slash, no '..'")]
    InvalidOutputPath(String),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PackError>;
