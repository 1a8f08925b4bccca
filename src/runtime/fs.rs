//! File system operations backing [`RealRuntime`].

use anyhow::{Context, Result};
use log::warn;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }

    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_dir_impl(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn current_dir_impl(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to determine current directory")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_directory_impl(&self, path: &Path) -> bool {
        // A trailing separator would make the OS resolve a symlink at `path`.
        let path: PathBuf = path.components().collect();
        let path = path.as_path();
        match fs::symlink_metadata(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => return true,
            Err(e) => {
                warn!("Failed to inspect {:?}: {}", path, e);
                return false;
            }
            // A link to a directory is removed as a link; anything else is refused.
            Ok(metadata) if metadata.file_type().is_symlink() => {
                if !path.is_dir() {
                    warn!("Not removing {:?}: symlink does not point to a directory", path);
                    return false;
                }
            }
            Ok(metadata) if !metadata.is_dir() => return false,
            Ok(_) => {}
        }
        match fs::remove_dir_all(path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove directory {:?}: {}", path, e);
                false
            }
        }
    }
}
