use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::AnsweringService;
use super::types::{parse_error_detail, ChatRequest, ChatResponse, SourceCatalog};
use crate::constants::{
    CHAT_ENDPOINT, HEALTH_CHECK_TIMEOUT_SECS, HEALTH_ENDPOINT, LIST_SOURCES_ENDPOINT,
};
use crate::utils::{ClientError, ExchangeError};

/// Answering service reached over HTTP/JSON
pub struct HttpAnsweringService {
    client: Client,
    base_url: String,
}

impl HttpAnsweringService {
    /// Create a new client for the service rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a response into `T`, mapping non-success statuses and bad bodies
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ExchangeError> {
    let status = response.status();
    if !status.is_success() {
        // The body is optional on errors; an unreadable one just means no detail
        let body = response.text().await.unwrap_or_default();
        let detail = parse_error_detail(&body);
        warn!(status = status.as_u16(), ?detail, "answering service returned an error");
        return Err(ExchangeError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ExchangeError::Malformed(e.to_string()))
}

#[async_trait]
impl AnsweringService for HttpAnsweringService {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ExchangeError> {
        let url = self.url(CHAT_ENDPOINT);
        debug!(%url, session_id = %request.session_id, source_id = ?request.source_id, "sending question");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        read_json(response).await
    }

    async fn list_sources(&self) -> Result<SourceCatalog, ExchangeError> {
        let url = self.url(LIST_SOURCES_ENDPOINT);
        debug!(%url, "fetching source catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        read_json(response).await
    }

    async fn health(&self) -> bool {
        let request = self
            .client
            .get(self.url(HEALTH_ENDPOINT))
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS));

        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a loopback port and return its base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}", addr)
    }

    /// Consume headers and any Content-Length body so the client sees a clean exchange
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
    }

    fn request(question: &str) -> ChatRequest {
        ChatRequest {
            question: question.to_string(),
            session_id: "user-1a2b3c4d".to_string(),
            model: "llama-3.3-70b".to_string(),
            source_id: None,
        }
    }

    #[tokio::test]
    async fn test_server_error_without_body() {
        let url = serve_once("500 Internal Server Error", "").await;
        let service = HttpAnsweringService::new(&url, Duration::from_secs(5)).unwrap();

        let err = service.chat(&request("hola")).await.unwrap_err();
        assert_eq!(
            err,
            ExchangeError::Status {
                status: 500,
                detail: None
            }
        );
    }

    #[tokio::test]
    async fn test_error_detail_is_carried() {
        let url = serve_once("400 Bad Request", r#"{"detail":"bad request"}"#).await;
        let service = HttpAnsweringService::new(&url, Duration::from_secs(5)).unwrap();

        let err = service.chat(&request("hola")).await.unwrap_err();
        assert_eq!(
            err,
            ExchangeError::Status {
                status: 400,
                detail: Some("bad request".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_success_with_invalid_body_is_malformed() {
        let url = serve_once("200 OK", "nope!").await;
        let service = HttpAnsweringService::new(&url, Duration::from_secs(5)).unwrap();

        let err = service.list_sources().await.unwrap_err();
        assert!(matches!(err, ExchangeError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_answer_is_decoded() {
        let url = serve_once("200 OK", r#"{"answer":"**42** ventas"}"#).await;
        let service = HttpAnsweringService::new(&url, Duration::from_secs(5)).unwrap();

        let response = service.chat(&request("¿cuántas?")).await.unwrap();
        assert_eq!(response.answer, "**42** ventas");
        assert_eq!(response.session_id, None);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let service =
            HttpAnsweringService::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(service.base_url(), "http://localhost:8000");
        assert_eq!(service.url(CHAT_ENDPOINT), "http://localhost:8000/chat");
        assert_eq!(
            service.url(LIST_SOURCES_ENDPOINT),
            "http://localhost:8000/list-sources"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on loopback is essentially never listening
        let service =
            HttpAnsweringService::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = service.list_sources().await.unwrap_err();
        assert!(matches!(err, ExchangeError::Network(_)));
        assert!(!service.health().await);
    }
}
