use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reqwest::Client;

use super::client::{ApiError, Result};
use super::models::DownloadRequest;

/// Status and full body of one answered request.
#[derive(Debug, Clone)]
pub struct RawReply {
    pub status: u16,
    pub body: Bytes,
}

impl RawReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The one network exchange the client performs. A failure here means the
/// exchange never completed; an answered request with an error status is an
/// `Ok` reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, endpoint: &str, request: &DownloadRequest) -> Result<RawReply>;
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Unreachable(format!("request timed out: {}", e))
    } else {
        ApiError::Unreachable(e.to_string())
    }
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    /// Applies to `post_json` only; asset downloads may run longer.
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(request_timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("failed to configure HTTP client, using defaults, ERROR: {e}");
                Client::new()
            });

        Self {
            client,
            request_timeout,
        }
    }

    /// Open a streaming download of an asset.
    /// Returns (total_size, stream)
    pub async fn download_file_stream(
        &self,
        download_url: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<Bytes>>)> {
        let response = self
            .client
            .get(download_url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(transport_error);

        Ok((total_size, stream))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, endpoint: &str, request: &DownloadRequest) -> Result<RawReply> {
        // `.json()` also sets `Content-Type: application/json`
        let response = self
            .client
            .post(endpoint)
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(RawReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_download_file_stream_reports_length() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v.mp4")
            .with_status(200)
            .with_body("0123456789")
            .create_async()
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let (total, stream) = transport
            .download_file_stream(&format!("{}/v.mp4", server.url()))
            .await
            .unwrap();

        let chunks: Vec<Bytes> = stream.map(|chunk| chunk.unwrap()).collect().await;
        let downloaded: usize = chunks.iter().map(|c| c.len()).sum();

        assert_eq!(total, Some(10));
        assert_eq!(downloaded, 10);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_file_stream_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.mp4")
            .with_status(410)
            .create_async()
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let result = transport
            .download_file_stream(&format!("{}/gone.mp4", server.url()))
            .await;

        assert!(matches!(result, Err(ApiError::HttpStatus(410))));
    }
}
