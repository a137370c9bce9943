use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{ApiError, Result};
use crate::domain::{AssetVariant, DownloadResult, SingleAsset};
use crate::utils::suggest_filename;

const DEFAULT_QUALITY: &str = "HD";

/// Body posted to the download endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// One entry of a `videos` list
#[derive(Debug, Clone, Deserialize)]
pub struct VideoEntry {
    pub url: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// Every field the endpoint has been seen to answer with. All three known
/// shapes decode into this one struct; `into_result` decides which applies.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadResponse {
    #[serde(default)]
    pub videos: Option<Vec<VideoEntry>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, rename = "downloadUrl")]
    pub download_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl DownloadResponse {
    /// Decode a raw body. Anything but a JSON object is malformed.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::MalformedResponse(format!("JSON decode error: {}", e)))?;

        if !value.is_object() {
            return Err(ApiError::MalformedResponse(
                "expected a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| ApiError::MalformedResponse(format!("unexpected field types: {}", e)))
    }

    pub fn into_result(self) -> Result<DownloadResult> {
        let videos_present = self.videos.is_some();

        if let Some(videos) = self.videos.filter(|v| !v.is_empty()) {
            if videos.iter().any(|entry| entry.url.trim().is_empty()) {
                return Err(ApiError::MalformedResponse(
                    "video entry without a url".to_string(),
                ));
            }

            let items = videos
                .into_iter()
                .map(|entry| AssetVariant {
                    file_url: entry.url,
                    quality: entry
                        .quality
                        .filter(|q| !q.is_empty())
                        .unwrap_or_else(|| DEFAULT_QUALITY.to_string()),
                    size_label: entry.size.filter(|s| !s.is_empty()),
                })
                .collect();
            return Ok(DownloadResult::AssetList(items));
        }

        let message = non_empty(self.message);
        if self.success == Some(false) {
            return Err(ApiError::NoAsset(message));
        }

        let direct = non_empty(self.download_url).or_else(|| non_empty(self.url));
        if let Some(file_url) = direct {
            let suggested_filename = suggest_filename(&file_url, self.filename.as_deref());
            return Ok(DownloadResult::SingleAsset(SingleAsset {
                file_url,
                suggested_filename,
            }));
        }

        if self.success == Some(true) || videos_present {
            return Err(ApiError::NoAsset(message));
        }

        Err(ApiError::MalformedResponse(
            "response matches no known shape".to_string(),
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    /// Upper bound on one submission, end to end.
    pub timeout: Duration,
    /// Sent as `format` when set.
    pub format: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://video-downloader-production-1235.up.railway.app/api/download"
                .to_string(),
            timeout: Duration::from_secs(30),
            format: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(body: &str) -> Result<DownloadResult> {
        DownloadResponse::from_slice(body.as_bytes())?.into_result()
    }

    #[test]
    fn test_request_omits_unset_format() {
        let request = DownloadRequest {
            url: "https://fb.watch/abc".to_string(),
            format: None,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"url":"https://fb.watch/abc"}"#
        );

        let request = DownloadRequest {
            format: Some("mp4".to_string()),
            ..request
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"url":"https://fb.watch/abc","format":"mp4"}"#
        );
    }

    #[test]
    fn test_plain_url_shape() {
        let result = interpret(r#"{"url": "https://cdn.example/v.mp4", "filename": "a.mp4"}"#);
        assert_eq!(
            result.unwrap(),
            DownloadResult::SingleAsset(SingleAsset {
                file_url: "https://cdn.example/v.mp4".to_string(),
                suggested_filename: "a.mp4".to_string(),
            })
        );
    }

    #[test]
    fn test_videos_shape_fills_defaults() {
        let result = interpret(
            r#"{"videos": [
                {"url": "https://cdn.example/hd.mp4", "quality": "720p", "size": "12 MB"},
                {"url": "https://cdn.example/sd.mp4"}
            ]}"#,
        )
        .unwrap();

        let DownloadResult::AssetList(items) = result else {
            panic!("expected an asset list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quality, "720p");
        assert_eq!(items[0].size_label.as_deref(), Some("12 MB"));
        assert_eq!(items[1].quality, "HD");
        assert_eq!(items[1].size_label, None);
    }

    #[test]
    fn test_videos_win_over_direct_url() {
        let result = interpret(
            r#"{"url": "https://cdn.example/x.mp4", "videos": [{"url": "https://cdn.example/hd.mp4"}]}"#,
        );
        assert!(matches!(result, Ok(DownloadResult::AssetList(_))));
    }

    #[test]
    fn test_empty_videos_is_no_asset() {
        assert!(matches!(interpret(r#"{"videos": []}"#), Err(ApiError::NoAsset(None))));
    }

    #[test]
    fn test_success_shape() {
        let result = interpret(
            r#"{"success": true, "downloadUrl": "https://cdn.example/d.mp4", "filename": "clip.mp4"}"#,
        );
        assert_eq!(
            result.unwrap(),
            DownloadResult::SingleAsset(SingleAsset {
                file_url: "https://cdn.example/d.mp4".to_string(),
                suggested_filename: "clip.mp4".to_string(),
            })
        );
    }

    #[test]
    fn test_success_false_carries_message() {
        let result = interpret(
            r#"{"success": false, "downloadUrl": "https://cdn.example/d.mp4", "message": "Private video"}"#,
        );
        match result {
            Err(ApiError::NoAsset(Some(message))) => assert_eq!(message, "Private video"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_blank_video_url_is_malformed() {
        assert!(matches!(
            interpret(r#"{"videos": [{"url": ""}]}"#),
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            interpret(r#"{"videos": [{"url": "https://cdn.example/hd.mp4"}, {"url": "  "}]}"#),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_blank_message_is_dropped() {
        assert!(matches!(
            interpret(r#"{"success": false, "message": ""}"#),
            Err(ApiError::NoAsset(None))
        ));
        assert!(matches!(
            interpret(r#"{"videos": [], "message": "   "}"#),
            Err(ApiError::NoAsset(None))
        ));
    }

    #[test]
    fn test_success_true_without_url_is_no_asset() {
        assert!(matches!(
            interpret(r#"{"success": true}"#),
            Err(ApiError::NoAsset(None))
        ));
    }

    #[test]
    fn test_unknown_shapes_are_malformed() {
        assert!(matches!(interpret("{}"), Err(ApiError::MalformedResponse(_))));
        assert!(matches!(interpret("[1, 2]"), Err(ApiError::MalformedResponse(_))));
        assert!(matches!(interpret("<html>"), Err(ApiError::MalformedResponse(_))));
        assert!(matches!(
            interpret(r#"{"videos": [{"quality": "HD"}]}"#),
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            interpret(r#"{"url": 42}"#),
            Err(ApiError::MalformedResponse(_))
        ));
    }
}
