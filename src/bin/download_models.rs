use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use screen_emotion_monitor::utils::{ModelManager, SetupUtils};

#[derive(Parser)]
#[command(name = "download-models", version, about = "Fetch the face detection and emotion ONNX models")]
struct Args {
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,

    /// Delete and re-download models that are already present.
    #[arg(long)]
    force: bool,

    /// Only list the installed models.
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list {
        let models = ModelManager::new(&args.models_dir).list_models().await?;
        if models.is_empty() {
            println!("No models installed in {}", args.models_dir.display());
        }
        for model in models {
            println!("{} {} ({}, {})", model.name, model.version, model.config.task, model.source_repo);
        }
        return Ok(());
    }

    println!("Downloading models...");
    let paths = if args.force {
        SetupUtils::refresh_models(&args.models_dir).await?
    } else {
        SetupUtils::ensure_models(&args.models_dir).await?
    };
    println!("Models ready!");
    println!("  detector:   {}", paths.detector.display());
    println!("  classifier: {}", paths.classifier.display());
    Ok(())
}
