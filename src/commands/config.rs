use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{config::RootConfig, runtime::Runtime};

/// Everything a command needs about the project it operates on.
pub struct Config<R: Runtime> {
    pub runtime: R,
    /// Project root; install paths are relative to it.
    pub root: PathBuf,
    pub root_config: RootConfig,
}

impl<R: Runtime> Config<R> {
    /// Resolve the project root (current directory unless given) and load
    /// its `composer.json`.
    pub fn new(runtime: R, root: Option<PathBuf>) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => runtime.current_dir()?,
        };
        debug!("Using project root {:?}", root);
        let root_config = RootConfig::load(&runtime, &root)?;

        Ok(Self {
            runtime,
            root,
            root_config,
        })
    }
}
