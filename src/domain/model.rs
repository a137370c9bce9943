/// One directly downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleAsset {
    pub file_url: String,
    pub suggested_filename: String,
}

/// One selectable quality of the same video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetVariant {
    pub file_url: String,
    pub quality: String,
    pub size_label: Option<String>,
}

/// What a successful submission yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    SingleAsset(SingleAsset),
    /// Never empty; an empty list is reported as `ApiError::NoAsset`.
    AssetList(Vec<AssetVariant>),
}

/// Externally visible state of a `VideoLinkClient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientPhase {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub label: String,
    pub download_url: String,
    pub suggested_filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPhase {
    Idle,
    Preparing,
    ChoosingQuality,
    AwaitingSavePath,
    Downloading,
    Completed,
    Failed,
}

impl DownloadPhase {
    /// True while input controls should stay disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::Preparing | Self::AwaitingSavePath | Self::Downloading
        )
    }
}
