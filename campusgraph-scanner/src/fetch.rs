use crate::error::RetrievalError;
use crate::result::Document;
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything that can turn a URL into a document.
///
/// The pipeline only talks to this trait, so tests and alternative transports
/// can stand in for [`HttpFetcher`].
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Document, RetrievalError>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, RetrievalError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .user_agent(concat!(
                "campusgraph/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/trapdoorsec/campusgraph)"
            ))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Document, RetrievalError> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let response_time = start.elapsed();

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        if response.url() != url {
            debug!("{} redirected to {}", url, response.url());
        }

        // The site mislabels its charset now and then; its pages are UTF-8.
        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(
            "Fetched {} ({}, {} bytes in {:?})",
            url,
            status.as_u16(),
            body.len(),
            response_time
        );

        Ok(Document {
            url: url.clone(),
            status_code: status.as_u16(),
            content_type,
            response_time,
            body,
        })
    }
}
