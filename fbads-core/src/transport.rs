//! The HTTP seam between request building and the wire.

use crate::error::AdsResult;
use crate::file::FileRef;
use crate::request::Method;
use async_trait::async_trait;

/// A fully prepared HTTP call.
///
/// GET and DELETE carry their arguments in `query`; POST carries them in
/// `form`, plus `files` as multipart parts when present.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub files: Vec<(String, FileRef)>,
}

impl HttpRequest {
    /// The argument pairs, wherever the method puts them.
    pub fn params(&self) -> &[(String, String)] {
        match self.method {
            Method::Post => &self.form,
            Method::Get | Method::Delete => &self.query,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one HTTP request and returns its response.
///
/// Implementations do not retry; connection-level failures are returned as
/// [`crate::AdsError::Transport`] and any status code is passed through.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> AdsResult<HttpResponse>;
}
