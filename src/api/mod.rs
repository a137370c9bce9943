pub mod client;
pub mod models;
pub mod transport;

pub use client::{ApiError, Result, VideoLinkClient};
pub use models::ApiConfig;
pub use transport::HttpTransport;
