use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Clipboard is not accessible")]
    Clipboard,
}

impl AppError {
    /// Message shown in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(ApiError::InvalidInput) => {
                "Invalid Facebook URL. Please enter a valid Facebook video link.".to_string()
            }
            Self::Fetch(ApiError::Busy) => "A request is already in progress.".to_string(),
            Self::Fetch(ApiError::HttpStatus(404)) => {
                "Video not found. Please check the URL.".to_string()
            }
            Self::Fetch(ApiError::HttpStatus(403)) => {
                "The video is private or not accessible.".to_string()
            }
            Self::Fetch(ApiError::HttpStatus(code)) => {
                format!("The server answered with status {}.", code)
            }
            Self::Fetch(ApiError::Unreachable(_)) => {
                "Error connecting to server. Please check your internet connection.".to_string()
            }
            Self::Fetch(ApiError::NoAsset(Some(message))) if !message.trim().is_empty() => {
                message.clone()
            }
            Self::Fetch(ApiError::NoAsset(_)) | Self::Fetch(ApiError::MalformedResponse(_)) => {
                "Could not fetch the video.".to_string()
            }
            Self::Io(e) => format!("Saving the file failed: {}", e),
            Self::Clipboard => {
                "Clipboard access is not available. Please paste the link manually.".to_string()
            }
        }
    }
}
