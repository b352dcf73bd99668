pub mod error;
pub mod types;

pub use error::{CrousError, Result};
pub use types::{
    GeoPoint, Listing, RawListing, Residence, SearchArea, SearchRequest, SearchResponse,
};

use std::time::Duration;

use reqwest::header;

pub const SITE_URL: &str = "https://trouverunlogement.lescrous.fr";

/// Tool id of the public student accommodation search.
pub const DEFAULT_TOOL_ID: u32 = 41;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Public detail page of an accommodation.
pub fn accommodation_url(tool_id: u32, listing_id: u64) -> String {
    format!("{SITE_URL}/tools/{tool_id}/accommodations/{listing_id}")
}

pub struct CrousClient {
    client: reqwest::Client,
    base_url: String,
    tool_id: u32,
}

impl CrousClient {
    pub fn new(tool_id: u32, timeout: Duration) -> Result<Self> {
        Self::with_base_url(SITE_URL, tool_id, timeout)
    }

    pub fn with_base_url(base_url: &str, tool_id: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tool_id,
        })
    }

    pub fn tool_id(&self) -> u32 {
        self.tool_id
    }

    fn search_url(&self) -> String {
        format!("{}/api/fr/search/{}", self.base_url, self.tool_id)
    }

    fn referer(&self) -> String {
        format!("{}/tools/{}/search", self.base_url, self.tool_id)
    }

    /// Fetch one page of search results. Pages start at 1; an empty vec means
    /// the result set is exhausted.
    pub async fn search_page(
        &self,
        page: u32,
        page_size: u32,
        area: &SearchArea,
    ) -> Result<Vec<RawListing>> {
        let body = SearchRequest {
            id_tool: self.tool_id,
            need_aggregation: true,
            page,
            page_size,
            location: area.corners(),
        };

        let resp = self
            .client
            .post(self.search_url())
            .header(header::ACCEPT, "application/ld+json, application/json")
            .header(header::ORIGIN, &self.base_url)
            .header(header::REFERER, self.referer())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CrousError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&text)?;
        let items = parsed.into_items();
        tracing::debug!(page, count = items.len(), "Fetched search page");

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Read one HTTP request, headers and body, off the socket.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        if key.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Answer a single request with a canned response. The handle yields the
    /// raw request that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{addr}"), handle)
    }

    fn client_for(base_url: &str) -> CrousClient {
        CrousClient::with_base_url(base_url, 41, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn search_page_posts_request_and_returns_items() {
        let (base, server) =
            serve_once("200 OK", r#"{"results":{"items":[{"id":1},{"id":2}]}}"#).await;

        let items = client_for(&base)
            .search_page(3, 24, &SearchArea::MARSEILLE)
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id_hint(), "2");
        assert!(request.starts_with("POST /api/fr/search/41 "));
        assert!(request.contains(r#""idTool":41"#));
        assert!(request.contains(r#""page":3"#));
        assert!(request.contains(r#""pageSize":24"#));
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let (base, server) = serve_once("502 Bad Gateway", "upstream down").await;

        let err = client_for(&base)
            .search_page(1, 24, &SearchArea::MARSEILLE)
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            CrousError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let (base, server) = serve_once("200 OK", "<html>maintenance</html>").await;

        let err = client_for(&base)
            .search_page(1, 24, &SearchArea::MARSEILLE)
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, CrousError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn accommodation_url_points_at_detail_page() {
        assert_eq!(
            accommodation_url(41, 2841),
            "https://trouverunlogement.lescrous.fr/tools/41/accommodations/2841"
        );
    }

    #[test]
    fn urls_follow_base_and_tool() {
        let client =
            CrousClient::with_base_url("http://localhost:9000/", 7, Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.search_url(), "http://localhost:9000/api/fr/search/7");
        assert_eq!(client.referer(), "http://localhost:9000/tools/7/search");
        assert_eq!(client.tool_id(), 7);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client =
            CrousClient::with_base_url("http://127.0.0.1:1", 41, Duration::from_secs(2)).unwrap();
        let err = client
            .search_page(1, 24, &SearchArea::MARSEILLE)
            .await
            .unwrap_err();
        assert!(matches!(err, CrousError::Network(_)), "got {err:?}");
    }
}
