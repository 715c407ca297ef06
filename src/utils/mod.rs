pub mod downloader;
pub mod model_manager;
pub mod panic;
pub mod setup;

pub use downloader::{DownloadError, DownloadRequest, DownloadResult, ModelDownloader};
pub use model_manager::{
    create_emotion_classifier_model_info, create_face_detector_model_info, ModelConfig, ModelFile, ModelInfo,
    ModelManager, ModelManagerError, ModelManagerResult,
};
pub use panic::panic_message;
pub use setup::{ModelPaths, SetupUtils};
