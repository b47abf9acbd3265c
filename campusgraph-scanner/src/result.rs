use std::time::Duration;
use url::Url;

/// A successfully retrieved page. `url` is the URL that was requested, even
/// when the server redirected; the body is always decoded as UTF-8.
#[derive(Debug, Clone)]
pub struct Document {
    pub url: Url,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub response_time: Duration,
    pub body: String,
}

impl Document {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            status_code: 200,
            content_type: None,
            response_time: Duration::from_secs(0),
            body: body.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}
