use std::path::{Path, PathBuf};

use super::model_manager::{
    create_emotion_classifier_model_info, create_face_detector_model_info, ModelInfo, ModelManager,
    ModelManagerResult,
};

/// Where the two ONNX files of the default analyzer live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub detector: PathBuf,
    pub classifier: PathBuf,
}

pub struct SetupUtils;

impl SetupUtils {
    pub fn required_models() -> [ModelInfo; 2] {
        [create_face_detector_model_info(), create_emotion_classifier_model_info()]
    }

    pub async fn ensure_models<P: AsRef<Path>>(models_dir: P) -> ModelManagerResult<ModelPaths> {
        let model_manager = ModelManager::new(models_dir);
        let [detector, classifier] = Self::required_models();

        let detector = model_manager.ensure_model(&detector).await?;
        let classifier = model_manager.ensure_model(&classifier).await?;

        Ok(ModelPaths { detector, classifier })
    }

    /// Drops and re-fetches both models.
    pub async fn refresh_models<P: AsRef<Path>>(models_dir: P) -> ModelManagerResult<ModelPaths> {
        let model_manager = ModelManager::new(&models_dir);
        for model in Self::required_models() {
            model_manager.remove_model(&model.name).await?;
        }
        Self::ensure_models(models_dir).await
    }
}
