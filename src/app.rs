use crate::api::{ApiConfig, ApiError};
use crate::application::{DownloadCoordinator, DownloadEvent};
use crate::domain::{AppError, ClientPhase, DownloadPhase, DownloadPlan, DownloadResult};
use crate::ui::{DownloadMessage, DownloadView};
use futures::StreamExt;
use iced::Task;
use std::path::PathBuf;

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        Self {
            view: DownloadView::default(),
            coordinator: DownloadCoordinator::new(ApiConfig::default()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Clipboard text, if it could be read
    Pasted(Option<String>),
    DownloadInfoReceived(Result<DownloadResult, AppError>),
    /// (Selected Path, What to download)
    FileSaveSelected(Option<PathBuf>, DownloadPlan),
    Download(DownloadEvent),
}

fn start_fetch(app: &mut DownloadApp) -> Task<Message> {
    if app.view.phase.is_busy() || app.coordinator.client_phase() == ClientPhase::Submitting {
        return Task::none();
    }

    let url = app.view.video_url.trim().to_string();
    if url.is_empty() {
        app.view.phase = DownloadPhase::Failed;
        app.view.error_message = Some("Please enter a video URL.".to_string());
        return Task::none();
    }
    if !<crate::api::VideoLinkClient>::validate(&url) {
        app.view.show_error(&ApiError::InvalidInput.into());
        return Task::none();
    }

    app.view.phase = DownloadPhase::Preparing;
    app.view.error_message = None;
    app.view.options.clear();
    app.view.status_message = "Fetching video info...".to_string();

    let coordinator = app.coordinator.clone();
    Task::perform(
        async move { coordinator.prepare_download(url).await },
        Message::DownloadInfoReceived,
    )
}

fn ask_save_path(app: &mut DownloadApp, plan: DownloadPlan) -> Task<Message> {
    app.view.phase = DownloadPhase::AwaitingSavePath;
    app.view.status_message = format!("Please select where to save {}...", plan.label);

    let coordinator = app.coordinator.clone();
    Task::perform(
        async move {
            let path = coordinator
                .choose_save_path(plan.suggested_filename.clone())
                .await;
            (path, plan)
        },
        |(path, plan)| Message::FileSaveSelected(path, plan),
    )
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::PastePressed => {
                    return iced::clipboard::read().map(Message::Pasted);
                }
                DownloadMessage::DownloadPressed => {
                    return start_fetch(app);
                }
                DownloadMessage::OptionSelected(index) => {
                    if let Some(variant) = app.view.options.get(index) {
                        let plan = DownloadCoordinator::plan_for_variant(variant);
                        return ask_save_path(app, plan);
                    }
                }
                DownloadMessage::UrlChanged(_) => {}
            }
        }
        Message::Pasted(Some(text)) => {
            app.view.set_url(text);
        }
        Message::Pasted(None) => {
            log::warn!("clipboard read returned nothing");
            app.view.show_error(&AppError::Clipboard);
        }
        Message::DownloadInfoReceived(result) => match result {
            Ok(DownloadResult::SingleAsset(asset)) => {
                let plan = DownloadCoordinator::plan_for_asset(&asset);
                return ask_save_path(app, plan);
            }
            Ok(DownloadResult::AssetList(items)) => {
                app.view.status_message = format!("{} qualities available", items.len());
                app.view.options = items;
                app.view.phase = DownloadPhase::ChoosingQuality;
            }
            Err(e) => {
                app.view.status_message = String::new();
                app.view.show_error(&e);
            }
        },
        Message::FileSaveSelected(path_opt, plan) => match path_opt {
            Some(path) => {
                app.view.phase = DownloadPhase::Downloading;
                app.view.download_progress = 0.0;
                app.view.status_message = format!("Downloading to: {}", path.display());

                return Task::stream(
                    app.coordinator
                        .download_stream(plan.download_url, path)
                        .map(Message::Download),
                );
            }
            None => {
                // User cancelled dialog
                app.view.phase = if app.view.options.is_empty() {
                    DownloadPhase::Idle
                } else {
                    DownloadPhase::ChoosingQuality
                };
                app.view.status_message = "Download cancelled".to_string();
            }
        },
        Message::Download(DownloadEvent::Progress(progress)) => {
            app.view.download_progress = progress;
            if progress >= 1.0 {
                app.view.status_message = "Download complete, finalizing...".to_string();
            } else {
                app.view.status_message = format!("Downloading: {:.1}%", progress * 100.0);
            }
        }
        Message::Download(DownloadEvent::Completed(path)) => {
            app.view.phase = DownloadPhase::Completed;
            app.view.download_progress = 0.0;
            app.view.status_message = format!("Saved: {}", path.display());
            app.view.clear_input();
        }
        Message::Download(DownloadEvent::Failed(e)) => {
            app.view.status_message = "Download failed".to_string();
            app.view.show_error(&e);
            if !app.view.options.is_empty() {
                app.view.phase = DownloadPhase::ChoosingQuality;
            }
        }
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
