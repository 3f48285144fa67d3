use thiserror::Error;

/// Failures talking to the video API or the insights generator
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("unexpected {service} response: {message}")]
    Payload {
        service: &'static str,
        message: String,
    },

    #[error("missing credentials: {0} is not set")]
    MissingCredentials(&'static str),
}
