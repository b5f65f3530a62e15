//! HTTP clients for the two news service contracts.
//!
//! The desk contract is `/fetch-news`, `/search` and `/summarize`; the digest
//! contract is `/api/fetch-and-summarize` and `/api/categories`. Every call is
//! a single JSON exchange: no retries, no backoff, and no timeout beyond what
//! `reqwest` does by default.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::data_models::{
    Article, CategoriesResponse, Category, Digest, FetchNewsRequest, FetchNewsResponse,
    SearchRequest, SearchResponse, SearchResult, SummarizeRequest, SummarizeResponse,
};
use crate::error::ClientError;

pub mod endpoints {
    pub const FETCH_NEWS: &str = "/fetch-news";
    pub const SEARCH: &str = "/search";
    pub const SUMMARIZE: &str = "/summarize";
    pub const FETCH_AND_SUMMARIZE: &str = "/api/fetch-and-summarize";
    pub const CATEGORIES: &str = "/api/categories";
}

#[async_trait]
pub trait DeskApi: Send + Sync {
    async fn fetch_news(&self, request: &FetchNewsRequest) -> Result<Vec<Article>, ClientError>;

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, ClientError>;

    async fn summarize(&self, request: &SummarizeRequest) -> Result<String, ClientError>;
}

#[async_trait]
pub trait DigestApi: Send + Sync {
    async fn fetch_and_summarize(&self, request: &FetchNewsRequest)
    -> Result<Digest, ClientError>;

    async fn categories(&self) -> Result<Vec<Category>, ClientError>;
}

/// A base url plus the shared `reqwest` client.
#[derive(Debug, Clone)]
struct JsonEndpoint {
    http: Client,
    base_url: String,
}

impl JsonEndpoint {
    fn new(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base url".to_string(),
            });
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                endpoint: path.to_string(),
                source,
            })?;
        Self::decode(path, response).await
    }

    async fn get<R>(&self, path: &str) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ClientError::Request {
                endpoint: path.to_string(),
                source,
            })?;
        Self::decode(path, response).await
    }

    async fn decode<R>(path: &str, response: Response) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Request {
                endpoint: path.to_string(),
                source,
            })?;
        debug!(endpoint = path, bytes = bytes.len(), "response received");
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

/// Client for the desk contract.
#[derive(Debug, Clone)]
pub struct HttpDeskClient {
    endpoint: JsonEndpoint,
}

impl HttpDeskClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint: JsonEndpoint::new(http, base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.endpoint.base_url
    }
}

#[async_trait]
impl DeskApi for HttpDeskClient {
    #[instrument(skip(self), fields(base = %self.endpoint.base_url))]
    async fn fetch_news(&self, request: &FetchNewsRequest) -> Result<Vec<Article>, ClientError> {
        let response: FetchNewsResponse =
            self.endpoint.post(endpoints::FETCH_NEWS, request).await?;
        debug!(articles = response.articles.len(), "news fetched");
        Ok(response.articles)
    }

    #[instrument(skip(self), fields(base = %self.endpoint.base_url))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, ClientError> {
        let response: SearchResponse = self.endpoint.post(endpoints::SEARCH, request).await?;
        Ok(response.results)
    }

    #[instrument(skip(self, request), fields(base = %self.endpoint.base_url, length = %request.summary_length))]
    async fn summarize(&self, request: &SummarizeRequest) -> Result<String, ClientError> {
        let response: SummarizeResponse =
            self.endpoint.post(endpoints::SUMMARIZE, request).await?;
        Ok(response.summary)
    }
}

/// Client for the digest contract.
#[derive(Debug, Clone)]
pub struct HttpDigestClient {
    endpoint: JsonEndpoint,
}

impl HttpDigestClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint: JsonEndpoint::new(http, base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.endpoint.base_url
    }
}

#[async_trait]
impl DigestApi for HttpDigestClient {
    #[instrument(skip(self), fields(base = %self.endpoint.base_url))]
    async fn fetch_and_summarize(
        &self,
        request: &FetchNewsRequest,
    ) -> Result<Digest, ClientError> {
        self.endpoint
            .post(endpoints::FETCH_AND_SUMMARIZE, request)
            .await
    }

    #[instrument(skip(self), fields(base = %self.endpoint.base_url))]
    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let response: CategoriesResponse = self.endpoint.get(endpoints::CATEGORIES).await?;
        Ok(response.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpDeskClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.endpoint.url(endpoints::FETCH_NEWS),
            "http://localhost:8000/fetch-news"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpDigestClient::new("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpDigestClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }
}
