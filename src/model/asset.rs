use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::AppError;

/// Packaged model blobs, resolved by name.
pub trait AssetSource: Send + Sync {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + Send>>;
}

pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectoryAssetSource {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(self.root.join(name))?))
    }
}

/// Copies the named asset into `staging_dir` unless a non-empty copy is already there.
pub fn stage_asset(
    source: &dyn AssetSource,
    name: &str,
    staging_dir: &Path,
) -> Result<PathBuf, AppError> {
    let target = staging_dir.join(name);
    if let Ok(metadata) = fs::metadata(&target)
        && metadata.is_file()
        && metadata.len() > 0
    {
        debug!("Reusing staged asset {}", target.display());
        return Ok(target);
    }

    let copied =
        copy_asset(source, name, staging_dir, &target).map_err(|source| AppError::AssetStaging {
            name: name.to_string(),
            source,
        })?;
    info!("Staged {} ({} bytes) to {}", name, copied, target.display());
    Ok(target)
}

fn copy_asset(
    source: &dyn AssetSource,
    name: &str,
    staging_dir: &Path,
    target: &Path,
) -> io::Result<u64> {
    fs::create_dir_all(staging_dir)?;
    // Written under a temporary name so a torn copy is never mistaken for a staged model.
    let partial = staging_dir.join(format!("{name}.partial"));
    let mut reader = source.open(name)?;
    let mut file = File::create(&partial)?;
    let copied = io::copy(&mut reader, &mut file)?;
    file.sync_all()?;
    drop(file);

    if copied == 0 {
        let _ = fs::remove_file(&partial);
        return Err(io::Error::new(io::ErrorKind::InvalidData, "asset is empty"));
    }
    fs::rename(&partial, target)?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        bytes: Vec<u8>,
        opens: AtomicUsize,
    }

    impl AssetSource for CountingSource {
        fn open(&self, name: &str) -> io::Result<Box<dyn Read + Send>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if name == "missing.onnx" {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such asset"));
            }
            Ok(Box::new(io::Cursor::new(self.bytes.clone())))
        }
    }

    fn source(bytes: &[u8]) -> CountingSource {
        CountingSource {
            bytes: bytes.to_vec(),
            opens: AtomicUsize::new(0),
        }
    }

    #[test]
    fn stages_once_and_reuses_existing_copy() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("models");
        let source = source(b"weights");

        let first = stage_asset(&source, "digit.onnx", &staging).unwrap();
        let second = stage_asset(&source, "digit.onnx", &staging).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&first).unwrap(), b"weights");
        assert_eq!(source.opens.load(Ordering::SeqCst), 1);
        assert!(!staging.join("digit.onnx.partial").exists());
    }

    #[test]
    fn empty_staged_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("digit.onnx"), b"").unwrap();
        let source = source(b"fresh");

        let path = stage_asset(&source, "digit.onnx", dir.path()).unwrap();

        assert_eq!(fs::read(path).unwrap(), b"fresh");
        assert_eq!(source.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_asset_reports_staging_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = stage_asset(&source(b"x"), "missing.onnx", dir.path()).unwrap_err();
        assert!(matches!(err, AppError::AssetStaging { ref name, .. } if name == "missing.onnx"));
    }

    #[test]
    fn empty_asset_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = stage_asset(&source(b""), "digit.onnx", dir.path()).unwrap_err();
        assert!(matches!(err, AppError::AssetStaging { .. }));
        assert!(!dir.path().join("digit.onnx").exists());
        assert!(!dir.path().join("digit.onnx.partial").exists());
    }

    #[test]
    fn directory_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.onnx"), b"abc").unwrap();
        let source = DirectoryAssetSource::new(dir.path());

        let mut contents = Vec::new();
        source
            .open("a.onnx")
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, b"abc");
        assert!(source.open("b.onnx").is_err());
    }
}
