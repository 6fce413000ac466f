// src/crawl/fetch.rs
// =============================================================================
// Fetching pages over HTTP.
//
// The crawler talks to the network through the PageFetcher trait. The real
// implementation (HttpFetcher) wraps one reqwest::Client, so every fetch of
// a crawl reuses the same connection pool. Tests swap in a scripted fetcher
// that serves canned pages from memory.
//
// A fetch is a single attempt: no retries. It follows redirects and reports
// the final URL so the caller can re-check that it is still in scope.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError};

/// Redirect hops followed before giving up on a page
const MAX_REDIRECTS: usize = 10;

/// What came back from fetching one URL
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    /// URL after following redirects
    pub final_url: String,
    /// Raw Content-Type header, if the server sent one
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_html(&self) -> bool {
        is_html_content_type(self.content_type.as_deref())
    }
}

fn is_html_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

/// Anything that can turn a URL into a fetched page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

// A borrowed fetcher is a fetcher too, so callers can keep ownership
#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        (**self).fetch(url).await
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the shared client: fixed timeout, browser-like User-Agent,
    // redirects followed
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(CrawlError::HttpClient)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Only HTML bodies are ever parsed; don't download anything else
        let body = if response.status().is_success() && is_html_content_type(content_type.as_deref()) {
            response.text().await.map_err(FetchError::from_reqwest)?
        } else {
            String::new()
        };

        Ok(FetchedPage {
            status,
            final_url,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn page(status: u16, content_type: Option<&str>) -> FetchedPage {
        FetchedPage {
            status,
            final_url: "https://example.com/".to_string(),
            content_type: content_type.map(str::to_string),
            body: String::new(),
        }
    }

    #[test]
    fn test_success_range() {
        assert!(page(200, None).is_success());
        assert!(page(204, None).is_success());
        assert!(!page(301, None).is_success());
        assert!(!page(500, None).is_success());
    }

    #[test]
    fn test_html_content_type() {
        assert!(page(200, Some("text/html; charset=utf-8")).is_html());
        assert!(page(200, Some("Text/HTML")).is_html());
        assert!(!page(200, Some("application/pdf")).is_html());
        assert!(!page(200, None).is_html());
    }

    #[test]
    fn test_client_builds_from_default_config() {
        assert!(HttpFetcher::new(&CrawlConfig::default()).is_ok());
    }

    fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
        let mut out = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            status,
            body.len()
        );
        for (name, value) in headers {
            out.push_str(&format!("{}: {}\r\n", name, value));
        }
        out.push_str("\r\n");
        out.push_str(body);
        out
    }

    // Serves canned responses by request path on a local port and returns
    // the base URL; unknown paths get a bare 404
    async fn serve(routes: Vec<(&'static str, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let reply = routes
                        .iter()
                        .find(|(route, _)| *route == path)
                        .map(|(_, reply)| reply.clone())
                        .unwrap_or_else(|| response("404 Not Found", &[], ""));

                    let _ = stream.write_all(reply.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_follows_redirect_and_reads_html() {
        let base = serve(vec![
            ("/old", response("301 Moved Permanently", &[("Location", "/new")], "")),
            (
                "/new",
                response(
                    "200 OK",
                    &[("Content-Type", "text/html; charset=utf-8")],
                    "<p>go with guide</p>",
                ),
            ),
        ])
        .await;
        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();

        let page = fetcher.fetch(&format!("{}/old", base)).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.final_url, format!("{}/new", base));
        assert_eq!(page.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(page.body, "<p>go with guide</p>");
    }

    #[tokio::test]
    async fn test_fetch_skips_body_for_non_html() {
        let base = serve(vec![(
            "/file.pdf",
            response("200 OK", &[("Content-Type", "application/pdf")], "%PDF-1.4"),
        )])
        .await;
        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();

        let page = fetcher.fetch(&format!("{}/file.pdf", base)).await.unwrap();

        assert!(page.is_success());
        assert!(!page.is_html());
        assert_eq!(page.content_type.as_deref(), Some("application/pdf"));
        assert!(page.body.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_skips_body_for_error_status() {
        let base = serve(vec![(
            "/broken",
            response("500 Internal Server Error", &[("Content-Type", "text/html")], "<p>oops</p>"),
        )])
        .await;
        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();

        let page = fetcher.fetch(&format!("{}/broken", base)).await.unwrap();

        assert_eq!(page.status, 500);
        assert!(page.body.is_empty());
    }
}
