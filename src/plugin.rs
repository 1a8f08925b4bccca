//! Registration of the installer with a host package manager.
//!
//! The host keeps an [`InstallationManager`]. Activating the [`Plugin`]
//! builds an [`InstallerPlugin`] for the project and adds it to the manager,
//! which from then on routes supported package types to it instead of the
//! host's default handling. Taking installers out of the manager again is
//! left to the host.

use anyhow::Result;
use log::debug;
use std::path::Path;
use std::sync::Arc;

use crate::config::RootConfig;
use crate::error::InstallerError;
use crate::installer::InstallerPlugin;
use crate::io::Io;
use crate::package::{InstalledRepository, Package};
use crate::runtime::Runtime;

/// What the host needs from an installer.
pub trait PackageInstaller: Send + Sync {
    fn supports(&self, package_type: &str) -> bool;
    fn install_path(&self, package: &Package) -> Result<String>;
    fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()>;
}

impl<R: Runtime, I: Io> PackageInstaller for InstallerPlugin<R, I> {
    fn supports(&self, package_type: &str) -> bool {
        InstallerPlugin::supports(self, package_type)
    }

    fn install_path(&self, package: &Package) -> Result<String> {
        InstallerPlugin::install_path(self, package)
    }

    fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        InstallerPlugin::uninstall(self, repo, package)
    }
}

/// The host's set of installers.
///
/// Installers added later take precedence over earlier ones.
#[derive(Default)]
pub struct InstallationManager {
    installers: Vec<Arc<dyn PackageInstaller>>,
}

impl InstallationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_installer(&mut self, installer: Arc<dyn PackageInstaller>) {
        self.installers.push(installer);
    }

    /// Remove a previously added installer. Returns false if it was not registered.
    pub fn remove_installer(&mut self, installer: &Arc<dyn PackageInstaller>) -> bool {
        let before = self.installers.len();
        self.installers
            .retain(|registered| !Arc::ptr_eq(registered, installer));
        self.installers.len() != before
    }

    pub fn len(&self) -> usize {
        self.installers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installers.is_empty()
    }

    /// The installer responsible for `package_type`.
    pub fn installer_for(&self, package_type: &str) -> Result<&Arc<dyn PackageInstaller>> {
        self.installers
            .iter()
            .rev()
            .find(|installer| installer.supports(package_type))
            .ok_or_else(|| InstallerError::UnsupportedType(package_type.to_string()).into())
    }

    pub fn install_path(&self, package: &Package) -> Result<String> {
        self.installer_for(&package.package_type)?
            .install_path(package)
    }

    pub fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        self.installer_for(&package.package_type)?
            .uninstall(repo, package)
    }
}

/// Plugin entry points called by the host.
#[derive(Debug, Default)]
pub struct Plugin;

impl Plugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the installer for the project at `root_dir` and register it.
    ///
    /// Custom `installer-paths` are read from the project's `composer.json`.
    pub fn activate<R, I>(
        &mut self,
        manager: &mut InstallationManager,
        runtime: R,
        io: I,
        root_dir: &Path,
    ) -> Result<()>
    where
        R: Runtime + 'static,
        I: Io + 'static,
    {
        let config = RootConfig::load(&runtime, root_dir)?;
        debug!(
            "Activating installer for {:?} with {} custom install path(s)",
            root_dir,
            config.installer_paths.entries().len()
        );

        let installer: Arc<dyn PackageInstaller> = Arc::new(
            InstallerPlugin::new(runtime, io)
                .with_installer_paths(config.installer_paths)
                .with_base_dir(root_dir),
        );
        manager.add_installer(installer);
        Ok(())
    }

    /// Nothing to undo; the host drops the installer from its manager itself.
    pub fn deactivate(&mut self, manager: &InstallationManager) {
        debug!(
            "Installer plugin deactivated, {} installer(s) still registered",
            manager.len()
        );
    }

    /// The plugin owns no persistent resources.
    pub fn uninstall(&mut self, manager: &InstallationManager) {
        debug!(
            "Installer plugin uninstalled, {} installer(s) still registered",
            manager.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind_of;
    use crate::io::MockIo;
    use crate::package::InstalledSet;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    /// Installer claiming every type that starts with `prefix`.
    struct FixedInstaller {
        prefix: &'static str,
        dir: &'static str,
    }

    impl PackageInstaller for FixedInstaller {
        fn supports(&self, package_type: &str) -> bool {
            package_type.starts_with(self.prefix)
        }

        fn install_path(&self, package: &Package) -> Result<String> {
            Ok(format!("{}/{}", self.dir, package.short_name()))
        }

        fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
            repo.remove_package(package);
            Ok(())
        }
    }

    fn runtime_without_composer_json() -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime
    }

    fn silent_io() -> MockIo {
        let mut io = MockIo::new();
        io.expect_write().return_const(());
        io.expect_write_error().return_const(());
        io
    }

    #[test]
    fn test_manager_routes_by_type() {
        let mut manager = InstallationManager::new();
        manager.add_installer(Arc::new(FixedInstaller {
            prefix: "library",
            dir: "vendor",
        }));
        manager.add_installer(Arc::new(FixedInstaller {
            prefix: "drupal-",
            dir: "web",
        }));

        let lib = Package::new("acme/lib", "library");
        let module = Package::new("acme/views", "drupal-module");
        assert_eq!(manager.install_path(&lib).unwrap(), "vendor/lib");
        assert_eq!(manager.install_path(&module).unwrap(), "web/views");
    }

    #[test]
    fn test_manager_latest_installer_wins() {
        let mut manager = InstallationManager::new();
        manager.add_installer(Arc::new(FixedInstaller {
            prefix: "blesta-",
            dir: "first",
        }));
        manager.add_installer(Arc::new(FixedInstaller {
            prefix: "blesta-",
            dir: "second",
        }));

        let package = Package::new("acme/cms", "blesta-plugin");
        assert_eq!(manager.install_path(&package).unwrap(), "second/cms");
    }

    #[test]
    fn test_manager_no_installer() {
        let manager = InstallationManager::new();
        assert!(manager.is_empty());

        let err = manager
            .install_path(&Package::new("acme/cms", "blesta-plugin"))
            .unwrap_err();
        assert_eq!(
            kind_of(&err),
            Some(&InstallerError::UnsupportedType("blesta-plugin".into()))
        );
    }

    #[test]
    fn test_remove_installer() {
        let mut manager = InstallationManager::new();
        let installer: Arc<dyn PackageInstaller> = Arc::new(FixedInstaller {
            prefix: "library",
            dir: "vendor",
        });
        manager.add_installer(Arc::clone(&installer));
        assert_eq!(manager.len(), 1);

        assert!(manager.remove_installer(&installer));
        assert!(!manager.remove_installer(&installer));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_activate_registers_installer() {
        let mut manager = InstallationManager::new();
        manager.add_installer(Arc::new(FixedInstaller {
            prefix: "library",
            dir: "vendor",
        }));

        let mut plugin = Plugin::new();
        plugin
            .activate(
                &mut manager,
                runtime_without_composer_json(),
                silent_io(),
                Path::new("/project"),
            )
            .unwrap();

        assert_eq!(manager.len(), 2);

        let package = Package::new("acme/paypal", "blesta-gateway-nonmerchant");
        assert_eq!(
            manager.install_path(&package).unwrap(),
            "components/gateways/nonmerchant/paypal/"
        );
        assert_eq!(
            manager
                .install_path(&Package::new("acme/lib", "library"))
                .unwrap(),
            "vendor/lib"
        );
    }

    #[test]
    fn test_activate_reads_installer_paths() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/project/composer.json")))
            .returning(|_| true);
        runtime.expect_read_to_string().returning(|_| {
            Ok(r#"{"extra": {"installer-paths": {"ext/{$name}/": ["type:blesta-plugin"]}}}"#.into())
        });

        let mut manager = InstallationManager::new();
        let mut plugin = Plugin::new();
        plugin
            .activate(&mut manager, runtime, silent_io(), Path::new("/project"))
            .unwrap();

        let package = Package::new("acme/cms", "blesta-plugin");
        assert_eq!(manager.install_path(&package).unwrap(), "ext/cms/");
    }

    #[test]
    fn test_activate_fails_on_invalid_composer_json() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("not json".into()));

        let mut manager = InstallationManager::new();
        let mut plugin = Plugin::new();
        let result = plugin.activate(&mut manager, runtime, silent_io(), Path::new("/project"));

        assert!(result.is_err());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_uninstall_through_manager() {
        let mut runtime = runtime_without_composer_json();
        runtime
            .expect_remove_directory()
            .with(eq(PathBuf::from("/project/components/reports/sales/")))
            .times(1)
            .returning(|_| true);

        let mut manager = InstallationManager::new();
        let mut plugin = Plugin::new();
        plugin
            .activate(&mut manager, runtime, silent_io(), Path::new("/project"))
            .unwrap();

        let package = Package::new("acme/sales", "blesta-report");
        let mut repo: InstalledSet = std::iter::once(package.clone()).collect();
        manager.uninstall(&mut repo, &package).unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_deactivate_and_uninstall_hooks() {
        let mut manager = InstallationManager::new();
        let mut plugin = Plugin::new();
        plugin
            .activate(
                &mut manager,
                runtime_without_composer_json(),
                silent_io(),
                Path::new("/project"),
            )
            .unwrap();

        assert_eq!(manager.len(), 1);

        plugin.deactivate(&manager);
        assert_eq!(manager.len(), 1);
        assert!(manager.installer_for("blesta-plugin").is_ok());

        plugin.uninstall(&manager);
        assert_eq!(manager.len(), 1);

        // The host takes the installer out on its own.
        let installer = Arc::clone(manager.installer_for("blesta-plugin").unwrap());
        assert!(manager.remove_installer(&installer));
        assert!(manager.is_empty());
    }
}
