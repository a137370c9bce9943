use iced::{
    widget::{button, column, progress_bar, row, text, text_input, Column, Space},
    Color, Element, Length,
};

use crate::api::VideoLinkClient;
use crate::domain::{AppError, AssetVariant, DownloadPhase};

const ERROR_RED: Color = Color::from_rgb(0.91, 0.30, 0.24);
const SUCCESS_GREEN: Color = Color::from_rgb(0.18, 0.80, 0.44);

/// Main view state
pub struct DownloadView {
    pub video_url: String,
    pub url_valid: bool,
    pub phase: DownloadPhase,
    pub status_message: String,
    pub error_message: Option<String>,
    pub options: Vec<AssetVariant>,
    pub download_progress: f32,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            video_url: String::new(),
            url_valid: true,
            phase: DownloadPhase::Idle,
            status_message: "Paste a Facebook video link to download".to_string(),
            error_message: None,
            options: Vec::new(),
            download_progress: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    PastePressed,
    DownloadPressed,
    OptionSelected(usize),
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.set_url(url);
            }
            DownloadMessage::PastePressed
            | DownloadMessage::DownloadPressed
            | DownloadMessage::OptionSelected(_) => {
                // Will be handled by the app
            }
        }
    }

    /// Replace the input text, re-check it and drop results of the previous link.
    pub fn set_url(&mut self, url: String) {
        let trimmed = url.trim();
        self.url_valid = trimmed.is_empty() || <VideoLinkClient>::validate(trimmed);
        self.video_url = url;
        self.error_message = None;
        self.options.clear();
        if !self.phase.is_busy() {
            self.phase = DownloadPhase::Idle;
        }
    }

    pub fn show_error(&mut self, error: &AppError) {
        self.phase = DownloadPhase::Failed;
        self.download_progress = 0.0;
        self.error_message = Some(error.user_message());
    }

    pub fn clear_input(&mut self) {
        self.video_url.clear();
        self.url_valid = true;
        self.options.clear();
    }

    fn option_row(index: usize, variant: &AssetVariant) -> Element<'_, DownloadMessage> {
        row![
            column![
                text(format!("{} Quality", variant.quality)).size(16),
                text(variant.size_label.as_deref().unwrap_or("Unknown size")).size(12),
            ]
            .width(Length::Fill),
            button("Download")
                .on_press(DownloadMessage::OptionSelected(index))
                .padding([6, 14]),
        ]
        .spacing(10)
        .into()
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let busy = self.phase.is_busy();

        let mut url_input = text_input("Paste Facebook video link...", &self.video_url).padding(10);
        if !busy {
            url_input = url_input
                .on_input(DownloadMessage::UrlChanged)
                .on_submit(DownloadMessage::DownloadPressed);
        }

        let download_label = if self.phase == DownloadPhase::Preparing {
            "Fetching..."
        } else {
            "Download"
        };

        let mut content = column![
            text("Facebook Video Downloader").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text("Video URL:").size(16),
            row![
                url_input.width(Length::Fill),
                button("Paste")
                    .on_press_maybe((!busy).then_some(DownloadMessage::PastePressed))
                    .padding(10),
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10);

        if !self.url_valid {
            content = content.push(
                text("This does not look like a Facebook video link")
                    .size(12)
                    .color(ERROR_RED),
            );
        }

        content = content
            .push(Space::new().height(Length::Fixed(10.0)))
            .push(
                button(download_label)
                    .on_press_maybe((!busy).then_some(DownloadMessage::DownloadPressed))
                    .padding([10, 20]),
            )
            .push(text(&self.status_message).size(14));

        if self.phase == DownloadPhase::Downloading {
            content = content.push(progress_bar(0.0..=1.0, self.download_progress));
        }

        if let Some(error) = &self.error_message {
            content = content.push(text(error).size(14).color(ERROR_RED));
        }

        if self.phase == DownloadPhase::Completed {
            content = content.push(text("Download complete!").size(14).color(SUCCESS_GREEN));
        }

        if self.phase == DownloadPhase::ChoosingQuality && !self.options.is_empty() {
            let options = Column::with_children(
                self.options
                    .iter()
                    .enumerate()
                    .map(|(index, variant)| Self::option_row(index, variant)),
            )
            .spacing(8);
            content = content
                .push(Space::new().height(Length::Fixed(10.0)))
                .push(text("Available qualities:").size(16))
                .push(options);
        }

        content.into()
    }
}
