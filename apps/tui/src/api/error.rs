use thiserror::Error;

/// Failure of a single dashboard API request. Every failure is terminal for
/// that request; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("sin detalle"))]
    Status { status: u16, message: Option<String> },

    /// The server answered `success: false`.
    #[error("{0}")]
    Server(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("could not write export: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Text for the user-facing alert. Server-provided messages are shown as is.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server(message) | Self::Status { message: Some(message), .. } => message.clone(),
            other => format!("Error al cargar los proyectos: {other}"),
        }
    }
}
