use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::downloader::{DownloadError, DownloadRequest, ModelDownloader};

pub const MODEL_INFO_FILE: &str = "model_info.json";

#[derive(Error, Debug)]
pub enum ModelManagerError {
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model not found at path: {0}")]
    ModelNotFound(String),

    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),
}

pub type ModelManagerResult<T> = Result<T, ModelManagerError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub source_repo: String,
    pub files: Vec<ModelFile>,
    pub config: ModelConfig,
}

impl ModelInfo {
    /// The `.onnx` file of the model, which is what sessions get built from.
    pub fn onnx_file(&self) -> ModelManagerResult<&ModelFile> {
        self.files
            .iter()
            .find(|file| file.filename.ends_with(".onnx"))
            .ok_or_else(|| ModelManagerError::InvalidConfig(format!("model '{}' lists no .onnx file", self.name)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub filename: String,
    pub url: String,
    pub sha256: Option<String>,
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_type: String,
    pub task: String,
    pub input_shape: Vec<usize>,
    pub output_labels: Vec<String>,
}

/// Keeps each model under `<models_dir>/<name>/` next to a `model_info.json`.
pub struct ModelManager {
    models_dir: PathBuf,
    downloader: ModelDownloader,
}

impl ModelManager {
    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
            downloader: ModelDownloader::new(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models_dir.join(model_name)
    }

    pub fn model_file_path(&self, model_info: &ModelInfo) -> ModelManagerResult<PathBuf> {
        Ok(self.model_path(&model_info.name).join(&model_info.onnx_file()?.filename))
    }

    pub async fn model_exists(&self, model_info: &ModelInfo) -> bool {
        let model_dir = self.model_path(&model_info.name);

        for file in &model_info.files {
            let file_path = model_dir.join(&file.filename);
            let Ok(metadata) = tokio::fs::metadata(&file_path).await else {
                return false;
            };
            if let Some(expected) = file.size_bytes {
                if metadata.len() != expected {
                    debug!("{} has {} bytes, expected {}", file_path.display(), metadata.len(), expected);
                    return false;
                }
            }
        }

        model_dir.join(MODEL_INFO_FILE).exists()
    }

    /// Downloads the model unless every file is already in place. Returns the
    /// path of its `.onnx` file.
    pub async fn ensure_model(&self, model_info: &ModelInfo) -> ModelManagerResult<PathBuf> {
        if self.model_exists(model_info).await {
            debug!("Model '{}' already present", model_info.name);
        } else {
            println!("Downloading model '{}'...", model_info.name);
            self.download_model(model_info).await?;
        }

        self.model_file_path(model_info)
    }

    pub async fn download_model(&self, model_info: &ModelInfo) -> ModelManagerResult<()> {
        let model_dir = self.model_path(&model_info.name);
        tokio::fs::create_dir_all(&model_dir).await?;

        let requests: Vec<DownloadRequest> = model_info
            .files
            .iter()
            .map(|file| DownloadRequest {
                url: file.url.clone(),
                destination: model_dir.join(&file.filename),
                sha256: file.sha256.clone(),
            })
            .collect();
        self.downloader.download_files(&requests).await?;

        let info_json = serde_json::to_string_pretty(model_info)?;
        tokio::fs::write(model_dir.join(MODEL_INFO_FILE), info_json).await?;

        info!("Model '{}' downloaded to {}", model_info.name, model_dir.display());
        Ok(())
    }

    pub async fn load_model_info<P: AsRef<Path>>(&self, model_path: P) -> ModelManagerResult<ModelInfo> {
        let info_path = model_path.as_ref().join(MODEL_INFO_FILE);

        if !info_path.exists() {
            return Err(ModelManagerError::ModelNotFound(info_path.display().to_string()));
        }

        let info_json = tokio::fs::read_to_string(info_path).await?;
        Ok(serde_json::from_str(&info_json)?)
    }

    pub async fn list_models(&self) -> ModelManagerResult<Vec<ModelInfo>> {
        let mut models = Vec::new();

        if !self.models_dir.exists() {
            return Ok(models);
        }

        let mut entries = tokio::fs::read_dir(&self.models_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Ok(model_info) = self.load_model_info(entry.path()).await {
                    models.push(model_info);
                }
            }
        }

        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }

    pub async fn remove_model(&self, model_name: &str) -> ModelManagerResult<()> {
        let model_dir = self.model_path(model_name);

        if model_dir.exists() {
            tokio::fs::remove_dir_all(&model_dir).await?;
            info!("Model '{}' removed", model_name);
        }

        Ok(())
    }
}

/// UltraFace RFB-320 face detector.
pub fn create_face_detector_model_info() -> ModelInfo {
    ModelInfo {
        name: "ultraface-rfb-320".to_string(),
        version: "1.0.0".to_string(),
        source_repo: "onnx/models".to_string(),
        files: vec![ModelFile {
            filename: "version-RFB-320.onnx".to_string(),
            url: "https://github.com/onnx/models/raw/main/validated/vision/body_analysis/ultraface/models/version-RFB-320.onnx".to_string(),
            sha256: None,
            size_bytes: None,
        }],
        config: ModelConfig {
            model_type: "ultraface".to_string(),
            task: "face-detection".to_string(),
            input_shape: vec![1, 3, 240, 320],
            output_labels: vec!["background".to_string(), "face".to_string()],
        },
    }
}

/// FER+ facial expression classifier.
pub fn create_emotion_classifier_model_info() -> ModelInfo {
    ModelInfo {
        name: "emotion-ferplus-8".to_string(),
        version: "8".to_string(),
        source_repo: "onnx/models".to_string(),
        files: vec![ModelFile {
            filename: "emotion-ferplus-8.onnx".to_string(),
            url: "https://github.com/onnx/models/raw/main/validated/vision/body_analysis/emotion_ferplus/model/emotion-ferplus-8.onnx".to_string(),
            sha256: None,
            size_bytes: None,
        }],
        config: ModelConfig {
            model_type: "ferplus".to_string(),
            task: "facial-expression-recognition".to_string(),
            input_shape: vec![1, 1, 64, 64],
            output_labels: ["neutral", "happiness", "surprise", "sadness", "anger", "disgust", "fear", "contempt"]
                .iter()
                .map(|label| label.to_string())
                .collect(),
        },
    }
}
