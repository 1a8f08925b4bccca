//! Root project configuration read from `composer.json`.
//!
//! Only the `extra.installer-paths` section matters to the installer. It maps
//! custom directory templates to the packages that should use them:
//!
//! ```json
//! {
//!     "extra": {
//!         "installer-paths": {
//!             "custom/gateways/{$name}/": ["type:blesta-gateway-merchant"],
//!             "vendored/{$vendor}/{$name}/": ["vendor:acme", "other/package"]
//!         }
//!     }
//! }
//! ```

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::package::Package;
use crate::runtime::Runtime;

pub const COMPOSER_JSON: &str = "composer.json";

#[derive(Deserialize, Debug, Default)]
struct ComposerJson {
    #[serde(default)]
    extra: RootExtra,
}

#[derive(Deserialize, Debug, Default)]
struct RootExtra {
    #[serde(rename = "installer-paths", default)]
    installer_paths: Map<String, Value>,
}

/// One `installer-paths` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerPath {
    pub template: String,
    /// `vendor/name`, `type:<package type>` or `vendor:<vendor>`.
    pub matchers: Vec<String>,
}

impl InstallerPath {
    pub fn new<S: Into<String>>(
        template: impl Into<String>,
        matchers: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            template: template.into(),
            matchers: matchers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, package: &Package) -> bool {
        self.matchers.iter().any(|matcher| {
            if let Some(package_type) = matcher.strip_prefix("type:") {
                package_type == package.package_type
            } else if let Some(vendor) = matcher.strip_prefix("vendor:") {
                vendor == package.vendor()
            } else {
                *matcher == package.name
            }
        })
    }
}

/// Custom install paths, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerPaths {
    entries: Vec<InstallerPath>,
}

impl InstallerPaths {
    pub fn new(entries: Vec<InstallerPath>) -> Self {
        Self { entries }
    }

    /// The template of the first entry matching `package`.
    pub fn find(&self, package: &Package) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.matches(package))
            .map(|entry| entry.template.as_str())
    }

    pub fn entries(&self) -> &[InstallerPath] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn from_map(map: Map<String, Value>) -> Result<Self> {
        let mut entries = Vec::with_capacity(map.len());
        for (template, value) in map {
            let matchers = match value {
                Value::String(matcher) => vec![matcher],
                Value::Array(values) => values
                    .into_iter()
                    .map(|v| match v {
                        Value::String(matcher) => Ok(matcher),
                        other => anyhow::bail!(
                            "installer-paths entry \"{}\" has a non-string matcher: {}",
                            template,
                            other
                        ),
                    })
                    .collect::<Result<Vec<_>>>()?,
                other => anyhow::bail!(
                    "installer-paths entry \"{}\" must be a string or a list, got {}",
                    template,
                    other
                ),
            };
            entries.push(InstallerPath { template, matchers });
        }
        Ok(Self { entries })
    }
}

/// Installer settings of the root project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootConfig {
    pub installer_paths: InstallerPaths,
}

impl RootConfig {
    /// Parse the contents of a root `composer.json`.
    pub fn parse(content: &str) -> Result<Self> {
        let composer: ComposerJson = serde_json::from_str(content)?;
        Ok(Self {
            installer_paths: InstallerPaths::from_map(composer.extra.installer_paths)?,
        })
    }

    /// Load `composer.json` from `root_dir`. A missing file is an empty config.
    pub fn load<R: Runtime>(runtime: &R, root_dir: &Path) -> Result<Self> {
        let path = root_dir.join(COMPOSER_JSON);
        if !runtime.exists(&path) {
            debug!("No {} in {:?}, using built-in install paths", COMPOSER_JSON, root_dir);
            return Ok(Self::default());
        }
        let content = runtime.read_to_string(&path)?;
        Self::parse(&content).with_context(|| format!("Invalid root configuration in {:?}", path))
    }
}
