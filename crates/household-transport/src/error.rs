/// Errors that can occur in the transport layer.
///
/// All of these mean "no usable response arrived". HTTP error statuses are
/// not transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The base URL or request path couldn't be turned into a URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A header name or value wasn't valid HTTP.
    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    /// The request didn't complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connecting or sending failed.
    #[cfg(feature = "reqwest")]
    #[error("request failed: {0}")]
    SendFailed(#[source] reqwest::Error),

    /// The response body couldn't be read.
    #[cfg(feature = "reqwest")]
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] reqwest::Error),

    /// Building the underlying client failed.
    #[cfg(feature = "reqwest")]
    #[error("client setup failed: {0}")]
    Setup(#[source] reqwest::Error),
}
