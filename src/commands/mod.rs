use anyhow::{Result, bail};
use log::debug;

use crate::{
    installer::InstallerPlugin,
    io::Io,
    package::{InstalledJson, installed_json_path},
    runtime::Runtime,
};

pub mod config;

use config::Config;

fn installer<'a, R: Runtime, I: Io>(
    config: &'a Config<R>,
    io: &'a I,
) -> InstallerPlugin<&'a R, &'a I> {
    InstallerPlugin::new(&config.runtime, io)
        .with_installer_paths(config.root_config.installer_paths.clone())
        .with_base_dir(&config.root)
}

/// List every supported package type and its directory template.
#[tracing::instrument(skip(config, io))]
pub fn types<R: Runtime, I: Io>(config: &Config<R>, io: &I) {
    for (package_type, template) in installer(config, io).registry().package_types() {
        io.write(&format!("{:<28}{}", package_type, template));
    }
}

/// Print whether a package type is handled by this installer.
#[tracing::instrument(skip(config, io))]
pub fn supports<R: Runtime, I: Io>(config: &Config<R>, io: &I, package_type: &str) -> bool {
    let supported = installer(config, io).supports(package_type);
    io.write(if supported { "true" } else { "false" });
    supported
}

/// Print the install path of a package.
#[tracing::instrument(skip(config, io))]
pub fn path<R: Runtime, I: Io>(
    config: &Config<R>,
    io: &I,
    package_type: &str,
    package_name: &str,
) -> Result<()> {
    let install_path = installer(config, io).resolve(package_type, package_name)?;
    io.write(&install_path);
    Ok(())
}

/// Uninstall a package recorded in the project's installed repository.
#[tracing::instrument(skip(config, io))]
pub fn uninstall<R: Runtime, I: Io>(config: &Config<R>, io: &I, package_name: &str) -> Result<()> {
    let mut repo = InstalledJson::load(&config.runtime, installed_json_path(&config.root))?;

    let Some(package) = repo.find(package_name).cloned() else {
        bail!(
            "Package {} is not recorded in {:?}",
            package_name,
            repo.path()
        );
    };
    debug!("Uninstalling {} ({})", package, package.package_type);

    installer(config, io).uninstall(&mut repo, &package)?;
    repo.save()
}
