use thiserror::Error;

/// Error surface shared by the blocking and async sessions.
///
/// Every failure is one of two kinds. `Request` means the exchange itself
/// rejected the call (`success: false` in the envelope) or a client-side
/// lookup found nothing. `Response` means the reply was unusable: a non-2xx
/// status, a transport failure, or a `result` shape that cannot be
/// normalized. No retries happen at this layer; each error carries the URL,
/// status code, or exchange message needed to diagnose it.
#[derive(Error, Debug)]
pub enum BittrexError {
    #[error("request rejected: {0}")]
    Request(String),

    #[error("response error: {0}")]
    Response(String),

    #[error("configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

impl From<reqwest::Error> for BittrexError {
    fn from(err: reqwest::Error) -> Self {
        Self::Response(format!("transport failure: {}", err))
    }
}

impl From<serde_json::Error> for BittrexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Response(format!("invalid JSON body: {}", err))
    }
}
