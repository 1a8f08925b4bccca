//! Package model and installed-package repositories.
//!
//! This module describes the packages the host hands to the installer and the
//! repositories that record which of them are installed.

mod installed_json;
mod package_type;
mod repository;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use installed_json::{INSTALLED_JSON, InstalledJson, installed_json_path};
pub use package_type::PackageType;
pub use repository::{InstalledRepository, InstalledSet};

#[cfg(test)]
pub use repository::MockInstalledRepository;

/// Package type Composer assigns when none is declared.
const DEFAULT_TYPE: &str = "library";

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

/// Installer hints a package declares in its `extra` section.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageExtra {
    /// Overrides the directory name the package installs into.
    #[serde(
        rename = "installer-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub installer_name: Option<String>,
}

/// A package as seen by the installer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Fully-qualified name, e.g. `vendor/name`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    pub package_type: String,
    #[serde(default)]
    pub extra: PackageExtra,
}

impl Package {
    pub fn new(name: impl Into<String>, package_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            package_type: package_type.into(),
            extra: PackageExtra::default(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_installer_name(mut self, installer_name: impl Into<String>) -> Self {
        self.extra.installer_name = Some(installer_name.into());
        self
    }

    /// The segment after the last `/`, or the whole name.
    pub fn short_name(&self) -> &str {
        match self.name.rsplit_once('/') {
            Some((_, name)) => name,
            None => &self.name,
        }
    }

    /// The segment before the last `/`, or an empty string.
    pub fn vendor(&self) -> &str {
        match self.name.rsplit_once('/') {
            Some((vendor, _)) => vendor,
            None => "",
        }
    }

    /// The declared `installer-name`, ignoring empty values.
    pub fn installer_name(&self) -> Option<&str> {
        self.extra
            .installer_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} ({})", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
