mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use iced::{window, Size};
use log::LevelFilter;

const LOG_FILE: &str = "fb-video-downloader.log";

fn init_logging() {
    if cfg!(debug_assertions) {
        simple_logging::log_to_stderr(LevelFilter::Info);
    } else if let Err(err) = simple_logging::log_to_file(LOG_FILE, LevelFilter::Info) {
        simple_logging::log_to_stderr(LevelFilter::Info);
        log::warn!("could not open '{LOG_FILE}', logging to stderr instead, ERROR: {err}");
    }
}

fn main() -> iced::Result {
    init_logging();

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("Facebook Video Downloader")
        .window(window::Settings {
            size: Size::new(520.0, 640.0),
            ..Default::default()
        })
        .run()
}
