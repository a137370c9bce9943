use std::path::PathBuf;

use futures::{stream::BoxStream, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::{
    api::{ApiConfig, HttpTransport, VideoLinkClient},
    domain::{AppError, AssetVariant, ClientPhase, DownloadPlan, DownloadResult, SingleAsset},
    utils::{get_timestamp, variant_filename},
};

#[derive(Debug, Clone)]
pub enum DownloadEvent {
    Progress(f32),
    Completed(PathBuf),
    Failed(AppError),
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    client: VideoLinkClient<HttpTransport>,
    transport: HttpTransport,
}

impl DownloadCoordinator {
    pub fn new(config: ApiConfig) -> Self {
        let client = VideoLinkClient::new(config);
        let transport = client.transport().clone();

        Self { client, transport }
    }

    pub fn client_phase(&self) -> ClientPhase {
        self.client.phase()
    }

    pub async fn prepare_download(&self, video_url: String) -> Result<DownloadResult, AppError> {
        Ok(self.client.submit(&video_url).await?)
    }

    pub fn plan_for_asset(asset: &SingleAsset) -> DownloadPlan {
        DownloadPlan {
            label: asset.suggested_filename.clone(),
            download_url: asset.file_url.clone(),
            suggested_filename: asset.suggested_filename.clone(),
        }
    }

    pub fn plan_for_variant(variant: &AssetVariant) -> DownloadPlan {
        DownloadPlan {
            label: format!("{} quality", variant.quality),
            download_url: variant.file_url.clone(),
            suggested_filename: variant_filename(&variant.quality, get_timestamp()),
        }
    }

    pub async fn choose_save_path(&self, suggested_filename: String) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_file_name(&suggested_filename)
            .add_filter("Video", &["mp4"])
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    pub fn download_stream(&self, url: String, path: PathBuf) -> BoxStream<'static, DownloadEvent> {
        futures::stream::unfold(
            DownloadRuntimeState::Start {
                transport: self.transport.clone(),
                url,
                path,
            },
            |state| async move {
                match state {
                    DownloadRuntimeState::Start {
                        transport,
                        url,
                        path,
                    } => {
                        let (total, stream) = match transport.download_file_stream(&url).await {
                            Ok((total, stream)) => (total, stream.boxed()),
                            Err(e) => {
                                log::error!("failed to open asset download, URL: {url}, ERROR: {e}");
                                return Some((
                                    DownloadEvent::Failed(e.into()),
                                    DownloadRuntimeState::Finished,
                                ));
                            }
                        };

                        let file = match tokio::fs::File::create(&path).await {
                            Ok(file) => file,
                            Err(e) => {
                                log::error!(
                                    "failed to create file, PATH: {}, ERROR: {e}",
                                    path.display()
                                );
                                return Some((
                                    DownloadEvent::Failed(AppError::Io(format!(
                                        "Failed to create file: {}",
                                        e
                                    ))),
                                    DownloadRuntimeState::Finished,
                                ));
                            }
                        };

                        log::info!("saving asset, PATH: {}, SIZE: {total:?}", path.display());
                        Some((
                            DownloadEvent::Progress(0.0),
                            DownloadRuntimeState::Downloading {
                                file,
                                stream,
                                downloaded: 0,
                                total,
                                path,
                            },
                        ))
                    }
                    DownloadRuntimeState::Downloading {
                        mut file,
                        mut stream,
                        mut downloaded,
                        total,
                        path,
                    } => match stream.next().await {
                        Some(Ok(chunk)) => {
                            if let Err(e) = file.write_all(&chunk).await {
                                return Some((
                                    DownloadEvent::Failed(AppError::Io(format!(
                                        "Write error: {}",
                                        e
                                    ))),
                                    DownloadRuntimeState::Finished,
                                ));
                            }

                            downloaded += chunk.len() as u64;

                            let progress = match total {
                                Some(total_size) if total_size > 0 => {
                                    (downloaded as f32 / total_size as f32).min(1.0)
                                }
                                _ => 0.0,
                            };

                            Some((
                                DownloadEvent::Progress(progress),
                                DownloadRuntimeState::Downloading {
                                    file,
                                    stream,
                                    downloaded,
                                    total,
                                    path,
                                },
                            ))
                        }
                        Some(Err(e)) => {
                            log::error!("asset download interrupted, ERROR: {e}");
                            Some((DownloadEvent::Failed(e.into()), DownloadRuntimeState::Finished))
                        }
                        None => {
                            if let Err(e) = file.sync_all().await {
                                return Some((
                                    DownloadEvent::Failed(AppError::Io(format!(
                                        "Failed to sync file: {}",
                                        e
                                    ))),
                                    DownloadRuntimeState::Finished,
                                ));
                            }

                            log::info!("asset saved, PATH: {}, BYTES: {downloaded}", path.display());
                            Some((
                                DownloadEvent::Completed(path),
                                DownloadRuntimeState::Finished,
                            ))
                        }
                    },
                    DownloadRuntimeState::Finished => None,
                }
            },
        )
        .boxed()
    }
}

enum DownloadRuntimeState {
    Start {
        transport: HttpTransport,
        url: String,
        path: PathBuf,
    },
    Downloading {
        file: tokio::fs::File,
        stream: BoxStream<'static, crate::api::Result<bytes::Bytes>>,
        downloaded: u64,
        total: Option<u64>,
        path: PathBuf,
    },
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use std::time::Duration;

    fn coordinator_for(server: &mockito::ServerGuard) -> DownloadCoordinator {
        DownloadCoordinator::new(ApiConfig {
            endpoint: format!("{}/api/download", server.url()),
            timeout: Duration::from_secs(5),
            format: None,
        })
    }

    #[test]
    fn test_plan_for_variant_uses_quality_in_filename() {
        let plan = DownloadCoordinator::plan_for_variant(&AssetVariant {
            file_url: "https://cdn.example/sd.mp4".to_string(),
            quality: "SD".to_string(),
            size_label: None,
        });

        assert_eq!(plan.download_url, "https://cdn.example/sd.mp4");
        assert_eq!(plan.label, "SD quality");
        assert!(plan.suggested_filename.starts_with("facebook_video_SD_"));
        assert!(plan.suggested_filename.ends_with(".mp4"));
    }

    #[tokio::test]
    async fn test_prepare_download_wraps_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/download")
            .with_status(404)
            .create_async()
            .await;

        let coordinator = coordinator_for(&server);
        let result = coordinator
            .prepare_download("https://facebook.com/video/1".to_string())
            .await;

        assert!(matches!(
            result,
            Err(AppError::Fetch(ApiError::HttpStatus(404)))
        ));
        assert_eq!(coordinator.client_phase(), ClientPhase::Idle);
    }

    #[tokio::test]
    async fn test_download_stream_writes_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v.mp4")
            .with_status(200)
            .with_body("fake video bytes")
            .create_async()
            .await;

        let path = std::env::temp_dir().join(format!(
            "fb-video-downloader-test-{}.mp4",
            std::process::id()
        ));
        let coordinator = coordinator_for(&server);
        let events: Vec<DownloadEvent> = coordinator
            .download_stream(format!("{}/v.mp4", server.url()), path.clone())
            .collect()
            .await;

        assert!(matches!(events.first(), Some(DownloadEvent::Progress(p)) if *p == 0.0));
        assert!(matches!(events.last(), Some(DownloadEvent::Completed(p)) if *p == path));
        assert!(events
            .iter()
            .any(|e| matches!(e, DownloadEvent::Progress(p) if *p == 1.0)));

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "fake video bytes");
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_download_stream_reports_status_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.mp4")
            .with_status(403)
            .create_async()
            .await;

        let path = std::env::temp_dir().join("fb-video-downloader-never-created.mp4");
        let coordinator = coordinator_for(&server);
        let events: Vec<DownloadEvent> = coordinator
            .download_stream(format!("{}/missing.mp4", server.url()), path.clone())
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DownloadEvent::Failed(AppError::Fetch(ApiError::HttpStatus(403)))
        ));
        assert!(!path.exists());
    }
}
