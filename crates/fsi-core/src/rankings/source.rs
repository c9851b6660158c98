// Remote rankings fetch. The loader talks to a `RankingsFetcher` so tests can
// substitute canned responses for HTTP.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::RankingsError;

/// Default timeout for one rankings download.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(12);

/// Downloads rankings CSV text.
#[async_trait]
pub trait RankingsFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, RankingsError>;
}

/// reqwest-backed fetcher. One GET per call, no retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, RankingsError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RankingsError::Fetch {
                url: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl RankingsFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, RankingsError> {
        debug!("fetching rankings from {}", url);
        let fetch_err = |e: reqwest::Error| RankingsError::Fetch {
            url: url.to_string(),
            message: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            },
        };

        let response = self.http.get(url).send().await.map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RankingsError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(fetch_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{status_line}\r\ncontent-type: text/csv\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/rankings.csv")
    }

    #[tokio::test]
    async fn fetches_body_on_success() {
        let url = serve_once("HTTP/1.1 200 OK", "player,pos\nA,RB\n").await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let text = fetcher.fetch_text(&url).await.unwrap();
        assert_eq!(text, "player,pos\nA,RB\n");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let url = serve_once("HTTP/1.1 404 Not Found", "missing").await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch_text(&url).await.unwrap_err();
        match err {
            RankingsError::HttpStatus { status, .. } => assert_eq!(status, 404),
            other => panic!("expected HttpStatus, got: {other}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_a_fetch_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        let err = fetcher
            .fetch_text(&format!("http://{addr}/x.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, RankingsError::Fetch { .. }));
    }
}
