use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for a viewer session. Missing fields fall back to defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Root holding `XRay/XR<n>/` and `CTScan/CT<n>/` image folders
    pub image_root: PathBuf,
    /// Region metadata files, merged in order
    pub region_metadata: Vec<PathBuf>,
    pub session_log: PathBuf,
    /// CSV log of user actions; not written when unset
    pub interaction_log: Option<PathBuf>,
    /// Width of the image container; height follows the slice aspect ratio
    pub display_width: f32,
    /// Number of selectable scans per modality
    pub scans_per_type: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            image_root: PathBuf::from("Photos"),
            region_metadata: Vec::new(),
            session_log: PathBuf::from("TimeLog.txt"),
            interaction_log: None,
            display_width: 1.0,
            scans_per_type: 3,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }
}
