use viewer_shared::http_client::HttpClientError;
use viewer_shared::FrameValidationError;

/// Errors raised at the I/O edges of the viewer.
///
/// The display loop itself cannot fail; these only appear when talking to a
/// stub server or when a surface refuses a frame.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Server could not be reached
    #[error("connection error: {0}")]
    Connection(String),
    /// Frame payload failed validation
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] FrameValidationError),
    /// Display sink rejected the frame
    #[error("render error: {0}")]
    Render(String),
    /// Server answered, but not with what we asked for
    #[error("request failed: {0}")]
    Http(String),
}

impl From<HttpClientError> for ViewerError {
    fn from(err: HttpClientError) -> Self {
        match err {
            HttpClientError::Unreachable(msg) => ViewerError::Connection(msg),
            other => ViewerError::Http(other.to_string()),
        }
    }
}
