use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::AppError;

/// A staged model file mapped read-only into memory.
pub struct MappedModel {
    path: PathBuf,
    map: Mmap,
}

impl MappedModel {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)?;
        // SAFETY: staged files are only ever replaced by rename, never truncated in place.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
