use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    Json, Router,
    body::Bytes,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use serde_json::{Value, json};

use newsdesk::client::{DeskApi, DigestApi, HttpDeskClient, HttpDigestClient};
use newsdesk::data_models::{FetchNewsRequest, SearchRequest, SummarizeRequest, SummaryLength};
use newsdesk::error::ClientError;

mod test_helpers {
    use super::*;

    /// Raw bodies and content types received by the fake service.
    pub type Received = Arc<Mutex<Vec<(Option<String>, String)>>>;

    pub async fn spawn_backend(router: Router) -> Result<String> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Ok(format!("http://{addr}"))
    }

    /// A POST route that records what it receives and answers `response`.
    pub fn recording_route(received: &Received, response: Value) -> axum::routing::MethodRouter {
        let received = received.clone();
        post(move |headers: HeaderMap, body: Bytes| {
            let received = received.clone();
            let response = response.clone();
            async move {
                let content_type = headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                received
                    .lock()
                    .unwrap()
                    .push((content_type, String::from_utf8_lossy(&body).into_owned()));
                Json(response)
            }
        })
    }

    pub fn received() -> Received {
        Arc::new(Mutex::new(Vec::new()))
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_fetch_news_request_body() -> Result<()> {
    let received = received();
    let router = Router::new().route(
        "/fetch-news",
        recording_route(
            &received,
            json!({
                "count": 1,
                "articles": [{
                    "title": "Chips",
                    "url": "https://news.example/chips",
                    "source": "Wire",
                    "category": "Technology",
                    "published": "2024-03-05T10:00:00Z",
                    "description": "d",
                    "content": "c",
                    "image": null
                }]
            }),
        ),
    );
    let base = spawn_backend(router).await?;
    let client = HttpDeskClient::new(&base)?;

    let articles = client
        .fetch_news(&FetchNewsRequest {
            categories: vec!["Technology".into()],
            max_articles: 5,
        })
        .await?;

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Chips");
    assert_eq!(articles[0].image, None);

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0.as_deref(), Some("application/json"));
    assert_eq!(
        received[0].1,
        r#"{"categories":["Technology"],"max_articles":5}"#
    );
    Ok(())
}

#[tokio::test]
async fn test_search_and_summarize() -> Result<()> {
    let searches = received();
    let summaries = received();
    let router = Router::new()
        .route(
            "/search",
            recording_route(
                &searches,
                json!({"count": 1, "results": [{"title": "t", "snippet": "s", "source": "src", "url": ""}]}),
            ),
        )
        .route("/summarize", recording_route(&summaries, json!({"summary": "X"})));
    let base = spawn_backend(router).await?;
    let client = HttpDeskClient::new(&base)?;

    let results = client
        .search(&SearchRequest {
            query: "rust".into(),
            k: 3,
        })
        .await?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].snippet, "s");

    let summary = client
        .summarize(&SummarizeRequest {
            text: "long text".into(),
            summary_length: SummaryLength::Short,
        })
        .await?;
    assert_eq!(summary, "X");

    assert_eq!(searches.lock().unwrap()[0].1, r#"{"query":"rust","k":3}"#);
    assert_eq!(
        summaries.lock().unwrap()[0].1,
        r#"{"text":"long text","summary_length":"short"}"#
    );
    Ok(())
}

#[tokio::test]
async fn test_digest_contract() -> Result<()> {
    let digests = received();
    let router = Router::new()
        .route(
            "/api/categories",
            get(|| async {
                Json(json!({"categories": [
                    {"name": "Sports", "icon": "⚽"},
                    {"name": "Health", "icon": "🏥"}
                ]}))
            }),
        )
        .route(
            "/api/fetch-and-summarize",
            recording_route(
                &digests,
                json!({"count": 1, "results": [{"title": "t", "source": "s", "summary": "sum"}]}),
            ),
        );
    let base = spawn_backend(router).await?;
    let client = HttpDigestClient::new(&format!("{base}/"))?;

    let categories = client.categories().await?;
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Sports");

    let digest = client
        .fetch_and_summarize(&FetchNewsRequest {
            categories: vec!["Health".into()],
            max_articles: 2,
        })
        .await?;
    assert_eq!(digest.count, 1);
    assert_eq!(digest.results[0].summary.as_deref(), Some("sum"));
    assert_eq!(
        digests.lock().unwrap()[0].1,
        r#"{"categories":["Health"],"max_articles":2}"#
    );
    Ok(())
}

#[tokio::test]
async fn test_error_status_is_an_error() -> Result<()> {
    let router = Router::new().route(
        "/fetch-news",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "feeds down"})),
            )
        }),
    );
    let base = spawn_backend(router).await?;
    let client = HttpDeskClient::new(&base)?;

    let err = client
        .fetch_news(&FetchNewsRequest {
            categories: vec!["General".into()],
            max_articles: 1,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_an_error() -> Result<()> {
    let router = Router::new().route("/summarize", post(|| async { "not json" }));
    let base = spawn_backend(router).await?;
    let client = HttpDeskClient::new(&base)?;

    let err = client
        .summarize(&SummarizeRequest {
            text: "t".into(),
            summary_length: SummaryLength::Medium,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_service() -> Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = HttpDigestClient::new(&format!("http://{addr}"))?;
    let err = client.categories().await.unwrap_err();
    assert!(matches!(err, ClientError::Request { .. }));
    Ok(())
}
