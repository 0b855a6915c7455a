use std::path::{Path, PathBuf};

use chrono::Utc;

const ARTIFACT_PREFIX: &str = "Processed_";

pub fn artifact_file_name(epoch_millis: i64, extension: &str) -> String {
    format!("{ARTIFACT_PREFIX}{epoch_millis}.{extension}")
}

/// `<dir>/Processed_<epoch-millis>.<extension>`, stamped now.
pub fn artifact_path(dir: &Path, extension: &str) -> PathBuf {
    dir.join(artifact_file_name(Utc::now().timestamp_millis(), extension))
}
