use screen_emotion_monitor::utils::{
    create_emotion_classifier_model_info, create_face_detector_model_info, ModelManager, ModelManagerError,
    SetupUtils,
};
use std::path::Path;

fn install_fake_model(models_dir: &Path, info: &screen_emotion_monitor::utils::ModelInfo) {
    let model_dir = models_dir.join(&info.name);
    std::fs::create_dir_all(&model_dir).unwrap();
    for file in &info.files {
        std::fs::write(model_dir.join(&file.filename), vec![0u8; 2048]).unwrap();
    }
    std::fs::write(model_dir.join("model_info.json"), serde_json::to_string_pretty(info).unwrap()).unwrap();
}

#[test]
fn test_model_exists_requires_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    let info = create_face_detector_model_info();

    assert!(!tokio_test::block_on(manager.model_exists(&info)));

    install_fake_model(dir.path(), &info);
    assert!(tokio_test::block_on(manager.model_exists(&info)));

    std::fs::remove_file(dir.path().join(&info.name).join("model_info.json")).unwrap();
    assert!(!tokio_test::block_on(manager.model_exists(&info)));
}

#[test]
fn test_size_mismatch_means_missing() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    let mut info = create_emotion_classifier_model_info();
    install_fake_model(dir.path(), &info);

    info.files[0].size_bytes = Some(4096);
    assert!(!tokio_test::block_on(manager.model_exists(&info)));

    info.files[0].size_bytes = Some(2048);
    assert!(tokio_test::block_on(manager.model_exists(&info)));
}

#[test]
fn test_ensure_models_uses_installed_files() {
    let dir = tempfile::tempdir().unwrap();
    for info in SetupUtils::required_models() {
        install_fake_model(dir.path(), &info);
    }

    let paths = tokio_test::block_on(SetupUtils::ensure_models(dir.path())).unwrap();
    assert_eq!(paths.detector, dir.path().join("ultraface-rfb-320").join("version-RFB-320.onnx"));
    assert_eq!(paths.classifier, dir.path().join("emotion-ferplus-8").join("emotion-ferplus-8.onnx"));
}

#[test]
fn test_list_and_remove_models() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    for info in SetupUtils::required_models() {
        install_fake_model(dir.path(), &info);
    }
    std::fs::create_dir_all(dir.path().join("stray")).unwrap();

    let names: Vec<String> = tokio_test::block_on(manager.list_models())
        .unwrap()
        .into_iter()
        .map(|info| info.name)
        .collect();
    assert_eq!(names, vec!["emotion-ferplus-8", "ultraface-rfb-320"]);

    tokio_test::block_on(manager.remove_model("emotion-ferplus-8")).unwrap();
    assert_eq!(tokio_test::block_on(manager.list_models()).unwrap().len(), 1);
}

#[test]
fn test_load_model_info_missing() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    let result = tokio_test::block_on(manager.load_model_info(dir.path().join("nothing")));
    assert!(matches!(result, Err(ModelManagerError::ModelNotFound(_))));
}

#[test]
#[ignore = "downloads both models from GitHub"]
fn test_download_real_models() {
    let dir = tempfile::tempdir().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let paths = rt.block_on(SetupUtils::ensure_models(dir.path())).unwrap();
    assert!(std::fs::metadata(paths.detector).unwrap().len() > 1000);
    assert!(std::fs::metadata(paths.classifier).unwrap().len() > 1000);
}
