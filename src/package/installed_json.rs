//! Repository backed by Composer's `vendor/composer/installed.json`.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::{InstalledRepository, Package};

/// Relative location of the installed repository inside a project.
pub const INSTALLED_JSON: &str = "vendor/composer/installed.json";

const DEV_PACKAGE_NAMES: &str = "dev-package-names";

/// Path of the installed repository of the project at `root`.
pub fn installed_json_path(root: &Path) -> PathBuf {
    root.join(INSTALLED_JSON)
}

/// Shape of the file on disk.
#[derive(Debug)]
enum Layout {
    /// `{"packages": [...], "dev": true, ...}`; holds every key but `packages`.
    Object(Map<String, Value>),
    /// A bare array of packages, as older Composer releases wrote it.
    Array,
}

#[derive(Debug)]
struct Entry {
    /// `None` if the entry could not be read as a package; kept for saving.
    package: Option<Package>,
    raw: Value,
}

/// Installed repository read from and written back to `installed.json`.
///
/// Fields the installer does not understand are preserved on save.
pub struct InstalledJson<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
    layout: Layout,
    entries: Vec<Entry>,
}

impl<'a, R: Runtime> InstalledJson<'a, R> {
    /// Load the repository at `path`.
    ///
    /// A missing file is an empty repository.
    pub fn load(runtime: &'a R, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !runtime.exists(&path) {
            debug!("No installed repository at {:?}", path);
            return Ok(Self {
                runtime,
                path,
                layout: Layout::Object(Map::new()),
                entries: Vec::new(),
            });
        }

        let content = runtime.read_to_string(&path)?;
        let document: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse installed repository {:?}", path))?;

        let (layout, raw_packages) = match document {
            Value::Array(packages) => (Layout::Array, packages),
            Value::Object(mut root) => {
                let packages = match root.remove("packages") {
                    Some(Value::Array(packages)) => packages,
                    Some(_) => bail!("{:?}: \"packages\" must be an array", path),
                    None => Vec::new(),
                };
                (Layout::Object(root), packages)
            }
            _ => bail!("{:?} is not a Composer installed repository", path),
        };

        let entries = raw_packages
            .into_iter()
            .map(|raw| {
                let package = match serde_json::from_value::<Package>(raw.clone()) {
                    Ok(package) => Some(package),
                    Err(e) => {
                        warn!("Skipping unreadable package entry in {:?}: {}", path, e);
                        None
                    }
                };
                Entry { package, raw }
            })
            .collect();

        Ok(Self {
            runtime,
            path,
            layout,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find an installed package by its fully-qualified name.
    pub fn find(&self, name: &str) -> Option<&Package> {
        self.packages().find(|package| package.name == name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.entries.iter().filter_map(|entry| entry.package.as_ref())
    }

    /// Write the repository back to its file.
    pub fn save(&self) -> Result<()> {
        let packages = Value::Array(self.entries.iter().map(|e| e.raw.clone()).collect());
        let document = match &self.layout {
            Layout::Array => packages,
            Layout::Object(rest) => {
                let mut root = Map::with_capacity(rest.len() + 1);
                root.insert("packages".to_string(), packages);
                for (key, value) in rest {
                    root.insert(key.clone(), value.clone());
                }
                Value::Object(root)
            }
        };

        let mut content = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
        document.serialize(&mut serializer)?;
        content.push(b'\n');

        self.runtime
            .write(&self.path, &content)
            .with_context(|| format!("Failed to save installed repository to {:?}", self.path))
    }
}

impl<R: Runtime> InstalledRepository for InstalledJson<'_, R> {
    fn has_package(&self, package: &Package) -> bool {
        self.find(&package.name).is_some()
    }

    fn remove_package(&mut self, package: &Package) {
        self.entries.retain(|entry| {
            entry
                .package
                .as_ref()
                .is_none_or(|installed| installed.name != package.name)
        });

        if let Layout::Object(root) = &mut self.layout
            && let Some(Value::Array(names)) = root.get_mut(DEV_PACKAGE_NAMES)
        {
            names.retain(|name| name.as_str() != Some(package.name.as_str()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::sync::{Arc, Mutex};

    const COMPOSER2: &str = r#"{
    "packages": [
        {
            "name": "acme/cms",
            "version": "1.0.0",
            "type": "blesta-plugin",
            "install-path": "../../plugins/cms"
        },
        {
            "name": "acme/paypal",
            "version": "2.1.0",
            "type": "blesta-gateway-nonmerchant"
        }
    ],
    "dev": true,
    "dev-package-names": ["acme/cms"]
}"#;

    fn mock_with_file(path: &'static str, content: &'static str) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from(path)))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from(path)))
            .returning(move |_| Ok(content.to_string()));
        runtime
    }

    #[test]
    fn test_installed_json_path() {
        assert_eq!(
            installed_json_path(Path::new("/srv/blesta")),
            PathBuf::from("/srv/blesta/vendor/composer/installed.json")
        );
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let repo = InstalledJson::load(&runtime, "/project/vendor/composer/installed.json").unwrap();
        assert_eq!(repo.packages().count(), 0);
        assert!(repo.find("acme/cms").is_none());
    }

    #[test]
    fn test_load_composer2_layout() {
        let runtime = mock_with_file("/p/installed.json", COMPOSER2);
        let repo = InstalledJson::load(&runtime, "/p/installed.json").unwrap();

        let cms = repo.find("acme/cms").unwrap();
        assert_eq!(cms.package_type, "blesta-plugin");
        assert_eq!(cms.version.as_deref(), Some("1.0.0"));
        assert_eq!(repo.packages().count(), 2);
        assert_eq!(repo.path(), Path::new("/p/installed.json"));
    }

    #[test]
    fn test_load_composer1_layout() {
        let runtime = mock_with_file(
            "/p/installed.json",
            r#"[{"name": "acme/report", "type": "blesta-report"}]"#,
        );
        let repo = InstalledJson::load(&runtime, "/p/installed.json").unwrap();
        assert!(repo.has_package(&Package::new("acme/report", "blesta-report")));
    }

    #[test]
    fn test_load_invalid_json() {
        let runtime = mock_with_file("/p/installed.json", "{not json");
        let err = InstalledJson::load(&runtime, "/p/installed.json")
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to parse installed repository"));
    }

    #[test]
    fn test_load_rejects_scalar_document() {
        let runtime = mock_with_file("/p/installed.json", "42");
        assert!(InstalledJson::load(&runtime, "/p/installed.json").is_err());
    }

    #[test]
    fn test_load_rejects_non_array_packages() {
        let runtime = mock_with_file("/p/installed.json", r#"{"packages": {}}"#);
        let err = InstalledJson::load(&runtime, "/p/installed.json")
            .err()
            .unwrap();
        assert!(err.to_string().contains("must be an array"));
    }

    #[test]
    fn test_unreadable_entries_are_kept_on_save() {
        let mut runtime = mock_with_file(
            "/p/installed.json",
            r#"[{"version": "1.0.0"}, {"name": "acme/cms", "type": "blesta-plugin"}]"#,
        );
        let written = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&written);
        runtime.expect_write().returning(move |_, contents| {
            *sink.lock().unwrap() = String::from_utf8(contents.to_vec()).unwrap();
            Ok(())
        });

        let mut repo = InstalledJson::load(&runtime, "/p/installed.json").unwrap();
        assert_eq!(repo.packages().count(), 1);
        repo.remove_package(&Package::new("acme/cms", "blesta-plugin"));
        repo.save().unwrap();

        let saved: Value = serde_json::from_str(&written.lock().unwrap()).unwrap();
        assert_eq!(saved, serde_json::json!([{"version": "1.0.0"}]));
    }

    #[test]
    fn test_remove_and_save_preserves_other_fields() {
        let mut runtime = mock_with_file("/p/installed.json", COMPOSER2);
        let written = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&written);
        runtime
            .expect_write()
            .with(eq(PathBuf::from("/p/installed.json")), mockall::predicate::always())
            .times(1)
            .returning(move |_, contents| {
                *sink.lock().unwrap() = String::from_utf8(contents.to_vec()).unwrap();
                Ok(())
            });

        let mut repo = InstalledJson::load(&runtime, "/p/installed.json").unwrap();
        let cms = Package::new("acme/cms", "blesta-plugin");
        assert!(repo.has_package(&cms));
        repo.remove_package(&cms);
        assert!(!repo.has_package(&cms));
        repo.save().unwrap();

        let content = written.lock().unwrap().clone();
        assert!(content.starts_with("{\n    \"packages\""));
        assert!(content.ends_with("}\n"));

        let saved: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(saved["dev"], Value::Bool(true));
        assert_eq!(saved["dev-package-names"], serde_json::json!([]));
        let packages = saved["packages"].as_array().unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0]["name"], "acme/paypal");
    }

    #[test]
    fn test_save_error_has_context() {
        let mut runtime = mock_with_file("/p/installed.json", COMPOSER2);
        runtime
            .expect_write()
            .returning(|_, _| Err(anyhow::anyhow!("disk full")));

        let repo = InstalledJson::load(&runtime, "/p/installed.json").unwrap();
        let err = repo.save().unwrap_err();
        assert!(err.to_string().contains("Failed to save installed repository"));
    }
}
