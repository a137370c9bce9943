pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{
    AssetVariant, ClientPhase, DownloadPhase, DownloadPlan, DownloadResult, SingleAsset,
};
