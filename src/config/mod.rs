pub mod monitor_config;

pub use monitor_config::{
    CaptureConfig, ConfigError, DetectionConfig, ModelsConfig, MonitorConfig, OutputConfig, PreviewConfig,
    ReportConfig, SamplingConfig, DEFAULT_CONFIG_FILE,
};
