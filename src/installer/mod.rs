//! Install-path resolution for typed packages.
//!
//! [`InstallerPlugin`] answers three questions for the host package manager:
//! whether it handles a package type at all ([`InstallerPlugin::supports`]),
//! where a package of that type goes ([`InstallerPlugin::install_path`]), and
//! how to take an installed package away again ([`InstallerPlugin::uninstall`]).
//!
//! Support checks and resolution share one matching routine, so a type is
//! supported exactly when resolving it succeeds.

mod template;

use anyhow::Result;
use log::debug;
use std::path::{Component, Path, PathBuf};

use crate::config::InstallerPaths;
use crate::error::InstallerError;
use crate::framework::{Location, TypeRegistry};
use crate::io::{Diagnostic, Io};
use crate::package::{InstalledRepository, Package, PackageType};
use crate::runtime::Runtime;

pub use template::{TemplateVars, render};
use template::is_single_segment;

fn unsupported(package_type: &str) -> anyhow::Error {
    InstallerError::UnsupportedType(package_type.to_string()).into()
}

/// Resolve `.` and `..` components without touching the file system.
///
/// Leading `..` components of a relative path are kept.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Whether `target` names an entry strictly below `base`.
fn is_inside(base: &Path, target: &Path) -> bool {
    let base = normalize_lexically(base);
    let target = normalize_lexically(target);
    match target.strip_prefix(&base) {
        Ok(rest) => {
            rest.components().next().is_some()
                && rest
                    .components()
                    .all(|component| matches!(component, Component::Normal(_)))
        }
        Err(_) => false,
    }
}

/// Resolves install locations for the registered package categories.
pub struct InstallerPlugin<R: Runtime, I: Io> {
    runtime: R,
    io: I,
    registry: TypeRegistry,
    installer_paths: InstallerPaths,
    base_dir: PathBuf,
}

impl<R: Runtime, I: Io> InstallerPlugin<R, I> {
    /// Create an installer using the built-in locations.
    ///
    /// Install paths are relative; directories are removed relative to the
    /// working directory until [`with_base_dir`](Self::with_base_dir) says otherwise.
    pub fn new(runtime: R, io: I) -> Self {
        Self {
            runtime,
            io,
            registry: TypeRegistry::new(),
            installer_paths: InstallerPaths::default(),
            base_dir: PathBuf::new(),
        }
    }

    /// Use custom `installer-paths` from the root project.
    pub fn with_installer_paths(mut self, installer_paths: InstallerPaths) -> Self {
        self.installer_paths = installer_paths;
        self
    }

    /// Directory that install paths are relative to.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Find the location registered for a full package type.
    ///
    /// Only the category prefix is split off; the remainder must equal a
    /// subtype key as a whole.
    fn match_location(&self, package_type: &str) -> Result<Location> {
        let parsed = PackageType::parse(package_type)?;

        let locations = match self.registry.locations_for(parsed.category()) {
            Ok(locations) => locations,
            Err(e) => {
                debug!("{}", e);
                return Err(unsupported(package_type));
            }
        };

        locations
            .iter()
            .find(|location| location.subtype == parsed.subtype())
            .copied()
            .ok_or_else(|| unsupported(package_type))
    }

    /// Resolve the install directory for a package type and a package name.
    ///
    /// Only the segment of `package_name` after its last `/` is used.
    pub fn resolve(&self, package_type: &str, package_name: &str) -> Result<String> {
        self.install_path(&Package::new(package_name, package_type))
    }

    /// Resolve the install directory of `package`.
    ///
    /// Fails with [`InstallerError::UnsupportedType`] if the package type is
    /// not registered. A matching `installer-paths` entry replaces the
    /// built-in template, and an `installer-name` replaces the short name.
    pub fn install_path(&self, package: &Package) -> Result<String> {
        let location = self.match_location(&package.package_type)?;

        let template = match self.installer_paths.find(package) {
            Some(custom) => {
                debug!("Using custom install path {:?} for {}", custom, package.name);
                custom
            }
            None => location.template,
        };

        Ok(render(template, &TemplateVars::for_package(package)))
    }

    /// Whether this installer handles `package_type`. Never fails.
    pub fn supports(&self, package_type: &str) -> bool {
        match self.match_location(package_type) {
            Ok(_) => true,
            Err(e) => {
                debug!("{}", e);
                // Foreign categories are routine; a known category with an
                // unknown subtype is worth telling the user about.
                if let Ok(parsed) = PackageType::parse(package_type)
                    && self.registry.framework(parsed.category()).is_some()
                {
                    Diagnostic::UnsupportedSubtype {
                        package_type: package_type.to_string(),
                    }
                    .emit(&self.io);
                }
                false
            }
        }
    }

    /// Remove `package` from `repo` and delete its install directory.
    ///
    /// Fails with [`InstallerError::PackageNotInstalled`] before touching
    /// anything if `repo` does not hold the package. Once the record is
    /// removed, resolution and deletion failures are only reported to the
    /// host's [`Io`].
    pub fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        if !repo.has_package(package) {
            return Err(InstallerError::PackageNotInstalled(package.to_string()).into());
        }

        debug!("Removing {} from the installed repository", package);
        repo.remove_package(package);

        let checked = self
            .install_path(package)
            .and_then(|path| self.deletion_target(package, path));
        let (install_path, target) = match checked {
            Ok(paths) => paths,
            Err(e) => {
                Diagnostic::UninstallFailed {
                    package: package.name.clone(),
                    reason: e.to_string(),
                }
                .emit(&self.io);
                return Ok(());
            }
        };

        debug!("Deleting install directory {:?}", target);
        let diagnostic = if self.runtime.remove_directory(&target) {
            Diagnostic::Deleted { path: install_path }
        } else {
            Diagnostic::NotDeleted { path: install_path }
        };
        diagnostic.emit(&self.io);

        Ok(())
    }

    /// Check that `install_path` of `package` is safe to delete recursively.
    ///
    /// The directory name must be a single path segment and the directory
    /// must stay below the base directory once `..` is resolved.
    fn deletion_target(
        &self,
        package: &Package,
        install_path: String,
    ) -> Result<(PathBuf, PathBuf)> {
        let name = TemplateVars::for_package(package).name;
        if !is_single_segment(name) {
            return Err(InstallerError::InvalidInstallName(name.to_string()).into());
        }

        let target = self.base_dir.join(&install_path);
        if !is_inside(&self.base_dir, &target) {
            return Err(InstallerError::PathOutsideProject(install_path).into());
        }
        Ok((PathBuf::from(install_path), target))
    }
}
