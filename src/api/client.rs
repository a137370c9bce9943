use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::models::{ApiConfig, DownloadRequest, DownloadResponse};
use super::transport::{HttpTransport, Transport};
use crate::domain::{ClientPhase, DownloadResult};

lazy_static! {
    static ref FACEBOOK_URL_RE: Regex =
        Regex::new(r"(?i)^https?://(www\.)?(facebook\.com|fb\.watch|m\.facebook\.com)").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Not a recognized Facebook video URL")]
    InvalidInput,

    #[error("Another request is already in flight")]
    Busy,

    #[error("Server unreachable: {0}")]
    Unreachable(String),

    #[error("Server returned HTTP status {0}")]
    HttpStatus(u16),

    #[error("Invalid response format: {0}")]
    MalformedResponse(String),

    #[error("No downloadable video{}", .0.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
    NoAsset(Option<String>),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Holds the client in `Submitting` until dropped, whichever way the
/// submission ends.
struct InFlight {
    submitting: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.submitting.store(false, Ordering::Release);
        log::debug!("client phase -> Idle");
    }
}

/// Validates Facebook video links and resolves them to downloadable files
/// through the remote download service. Clones share one in-flight slot.
pub struct VideoLinkClient<T = HttpTransport> {
    config: ApiConfig,
    transport: Arc<T>,
    submitting: Arc<AtomicBool>,
}

impl<T> Clone for VideoLinkClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
            submitting: Arc::clone(&self.submitting),
        }
    }
}

impl VideoLinkClient<HttpTransport> {
    pub fn new(config: ApiConfig) -> Self {
        let transport = HttpTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> VideoLinkClient<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// True if the trimmed text starts with an http(s) link to a recognized host.
    pub fn validate(candidate: &str) -> bool {
        FACEBOOK_URL_RE.is_match(candidate.trim())
    }

    pub fn phase(&self) -> ClientPhase {
        if self.submitting.load(Ordering::Acquire) {
            ClientPhase::Submitting
        } else {
            ClientPhase::Idle
        }
    }

    fn begin(&self) -> Result<InFlight> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ApiError::Busy)?;
        log::debug!("client phase -> Submitting");

        Ok(InFlight {
            submitting: Arc::clone(&self.submitting),
        })
    }

    /// Send a validated link to the download service and interpret its answer.
    ///
    /// Fails with `InvalidInput` before touching the network if the link does
    /// not validate, and with `Busy` if another submission is still pending.
    pub async fn submit(&self, candidate: &str) -> Result<DownloadResult> {
        let source_url = candidate.trim();
        if source_url.is_empty() || !Self::validate(source_url) {
            return Err(ApiError::InvalidInput);
        }

        let _in_flight = self.begin()?;

        let request = DownloadRequest {
            url: source_url.to_string(),
            format: self.config.format.clone(),
        };
        log::info!("submitting video link, URL: {source_url}");

        let exchange = self.transport.post_json(&self.config.endpoint, &request);
        let reply = match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(reply) => reply,
            Err(_) => Err(ApiError::Unreachable(format!(
                "no response within {:?}",
                self.config.timeout
            ))),
        }
        .inspect_err(|err| log::error!("download service exchange failed, ERROR: {err}"))?;

        if !reply.is_success() {
            log::warn!("download service answered with status {}", reply.status);
            return Err(ApiError::HttpStatus(reply.status));
        }

        let result = DownloadResponse::from_slice(&reply.body)?
            .into_result()
            .inspect_err(|err| log::warn!("no usable asset in response, ERROR: {err}"))?;

        match &result {
            DownloadResult::SingleAsset(asset) => {
                log::info!("resolved single asset, FILE: {}", asset.suggested_filename)
            }
            DownloadResult::AssetList(items) => {
                log::info!("resolved {} quality variants", items.len())
            }
        }

        Ok(result)
    }
}
