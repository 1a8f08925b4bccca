//! Runtime abstraction for filesystem access.
//!
//! The installer never touches the filesystem directly; everything goes
//! through [`Runtime`] so tests can substitute a mock.

mod fs;

use anyhow::Result;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn current_dir(&self) -> Result<PathBuf>;

    /// Remove a directory and its contents, best effort.
    /// Returns true if the directory is gone afterwards, including when it
    /// never existed. Failures are logged, not returned.
    fn remove_directory(&self, path: &Path) -> bool;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn remove_directory(&self, path: &Path) -> bool {
        self.remove_directory_impl(path)
    }
}

impl<T: Runtime + ?Sized> Runtime for &T {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        (**self).write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        (**self).current_dir()
    }

    fn remove_directory(&self, path: &Path) -> bool {
        (**self).remove_directory(path)
    }
}
