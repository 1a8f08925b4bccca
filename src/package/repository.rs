//! Installed-package repository abstraction.

use std::collections::BTreeMap;

use super::Package;

/// The host's record of installed packages.
#[cfg_attr(test, mockall::automock)]
pub trait InstalledRepository {
    fn has_package(&self, package: &Package) -> bool;
    fn remove_package(&mut self, package: &Package);
}

/// In-memory repository keyed by package name.
#[derive(Debug, Clone, Default)]
pub struct InstalledSet {
    packages: BTreeMap<String, Package>,
}

impl InstalledSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a package, replacing any package with the same name.
    pub fn add_package(&mut self, package: Package) {
        self.packages.insert(package.name.clone(), package);
    }

    pub fn find(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<Package> for InstalledSet {
    fn from_iter<T: IntoIterator<Item = Package>>(iter: T) -> Self {
        let mut set = Self::new();
        for package in iter {
            set.add_package(package);
        }
        set
    }
}

impl InstalledRepository for InstalledSet {
    fn has_package(&self, package: &Package) -> bool {
        self.packages.contains_key(&package.name)
    }

    fn remove_package(&mut self, package: &Package) {
        self.packages.remove(&package.name);
    }
}
