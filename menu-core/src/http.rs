/// Minimal blocking HTTP seam used by the menu client
use crate::error::NetworkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body as text for logging; invalid UTF-8 is replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One request per call, no retries. Implementations return
/// [`NetworkError::Transport`] when no response was received at all; any
/// received status, including errors, comes back as `Ok`.
pub trait HttpTransport {
    fn get(&mut self, url: &str) -> Result<HttpResponse, NetworkError>;

    fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse, NetworkError>;
}
