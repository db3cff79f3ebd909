//! Monit HTTP 클라이언트
//!
//! Connection pooling과 타임아웃을 지원하는 비동기 HTTP 클라이언트입니다.

use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

use super::parser::CollectResult;
use crate::error::CollectorError;

/// Monit HTTP 클라이언트
#[derive(Clone)]
pub struct MonitClient {
    client: Client,
    scrape_uri: String,
    timeout: Duration,
    auth: Option<(String, String)>,
}

impl MonitClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `scrape_uri` - Monit 상태 페이지 URI (예: "http://localhost:2812/_status?format=xml&level=full")
    /// * `timeout_ms` - 요청 타임아웃 (밀리초)
    /// * `ignore_ssl` - TLS 인증서 검증 생략 여부
    ///
    /// # Example
    /// ```ignore
    /// let client = MonitClient::new("http://localhost:2812/_status?format=xml", 5000, false)?;
    /// ```
    pub fn new(scrape_uri: &str, timeout_ms: u64, ignore_ssl: bool) -> CollectResult<Self> {
        let timeout = Duration::from_millis(timeout_ms);
        let client = ClientBuilder::new()
            .timeout(timeout)
            .danger_accept_invalid_certs(ignore_ssl)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(CollectorError::HttpClientInit)?;

        Ok(Self {
            client,
            scrape_uri: scrape_uri.to_string(),
            timeout,
            auth: None,
        })
    }

    /// Basic Auth 설정
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.auth = Some((username.to_string(), password.to_string()));
        self
    }

    /// 대상 URI
    pub fn scrape_uri(&self) -> &str {
        &self.scrape_uri
    }

    /// 상태 문서 조회
    ///
    /// Returns the raw body of a 200 response. A 401 maps to
    /// `CollectorError::Authentication`, any other status to
    /// `CollectorError::UpstreamStatus`; connection, timeout and body read
    /// failures map to `CollectorError::Transport`. No retries.
    #[instrument(skip(self), fields(uri = %self.scrape_uri))]
    pub async fn fetch_status(&self) -> CollectResult<Vec<u8>> {
        let mut req = self.client.get(&self.scrape_uri);

        if let Some((username, password)) = &self.auth {
            req = req.basic_auth(username, Some(password));
        }

        debug!(timeout_ms = self.timeout.as_millis() as u64, "Fetching monit status");

        let response = req.send().await.map_err(CollectorError::Transport)?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => return Err(CollectorError::Authentication),
            status => return Err(CollectorError::UpstreamStatus(status.to_string())),
        }

        let body = response
            .bytes()
            .await
            .map_err(CollectorError::Transport)?;

        debug!(bytes = body.len(), "Monit status received");

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = MonitClient::new("http://localhost:2812/_status?format=xml", 5000, false);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_ignore_ssl() {
        let client = MonitClient::new("https://localhost:2812/_status?format=xml", 5000, true);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_auth() {
        let client = MonitClient::new("http://localhost:2812/_status", 5000, false)
            .unwrap()
            .with_auth("admin", "monit");
        assert_eq!(
            client.auth,
            Some(("admin".to_string(), "monit".to_string()))
        );
        assert_eq!(client.scrape_uri(), "http://localhost:2812/_status");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // port 1 is reserved and closed on test hosts
        let client = MonitClient::new("http://127.0.0.1:1/_status", 1000, false).unwrap();
        let err = client.fetch_status().await.unwrap_err();
        assert!(matches!(err, CollectorError::Transport(_)));
    }
}
