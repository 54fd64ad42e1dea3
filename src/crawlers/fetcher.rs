use std::fmt;

/// Source of page bodies for the scanner.
///
/// A successful fetch yields the body text; anything else is a [`FetchError`]
/// so callers can tell an unreachable page apart from a page without the keyword.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Why a page body could not be retrieved
#[derive(Debug)]
pub enum FetchError {
    /// The server answered with something other than 200 OK
    Status(u16),
    /// No response within the configured timeout
    Timeout,
    /// Connection, TLS, redirect or body decoding failure
    Request(reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Request(err)
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "HTTP status {}", code),
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::Request(e) => write!(f, "request error: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Request(e) => Some(e),
            _ => None,
        }
    }
}
