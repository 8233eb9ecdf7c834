use std::time::Duration;

use reqwest::StatusCode;
use scraper::Html;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("{url} returned an empty body")]
    EmptyBody { url: String },
    #[error("{url} did not return html markup")]
    Malformed { url: String },
}

/// Anything that can hand back the body of a URL as text.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Single-attempt HTTP fetcher bounded by the client timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = response.text().await.map_err(request_error)?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }
        Ok(body)
    }
}

/// Fetches `url` and parses it as an html document.
pub async fn fetch_page<S: PageSource>(source: &S, url: &str) -> Result<Html, FetchError> {
    let body = source.fetch(url).await?;
    if !body.trim_start().starts_with('<') {
        return Err(FetchError::Malformed {
            url: url.to_string(),
        });
    }
    Ok(Html::parse_document(&body))
}
