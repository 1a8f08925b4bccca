//! Package categories and the directory templates they install into.
//!
//! A package type such as `blesta-gateway-merchant` is made of a category
//! prefix (`blesta`) and a subtype (`gateway-merchant`). Each category owns a
//! fixed table of subtypes, and each subtype a directory template.

mod blesta;

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::error::InstallerError;

/// A subtype and the directory template its packages install into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub subtype: &'static str,
    /// Directory template containing a `{$name}` placeholder.
    pub template: &'static str,
}

impl Location {
    pub const fn new(subtype: &'static str, template: &'static str) -> Self {
        Self { subtype, template }
    }
}

/// Category of packages this installer knows how to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    Blesta,
}

impl Framework {
    pub const ALL: &'static [Framework] = &[Framework::Blesta];

    /// The category prefix used in package types.
    pub fn prefix(&self) -> &'static str {
        match self {
            Framework::Blesta => "blesta",
        }
    }

    pub fn locations(&self) -> &'static [Location] {
        match self {
            Framework::Blesta => blesta::LOCATIONS,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl FromStr for Framework {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Framework::ALL
            .iter()
            .copied()
            .find(|framework| framework.prefix() == s)
            .ok_or_else(|| InstallerError::UnknownCategory(s.to_string()).into())
    }
}

/// Lookup table from category prefix to its subtype locations.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    frameworks: Vec<Framework>,
}

impl TypeRegistry {
    /// Create a registry holding every built-in category.
    pub fn new() -> Self {
        Self {
            frameworks: Framework::ALL.to_vec(),
        }
    }

    /// Find the framework registered under a category prefix.
    pub fn framework(&self, category: &str) -> Option<Framework> {
        category
            .parse::<Framework>()
            .ok()
            .filter(|framework| self.frameworks.contains(framework))
    }

    /// Return every subtype location of a category.
    ///
    /// Fails with [`InstallerError::UnknownCategory`] if the category is not
    /// registered.
    pub fn locations_for(&self, category: &str) -> Result<&'static [Location]> {
        self.framework(category)
            .map(|framework| framework.locations())
            .ok_or_else(|| InstallerError::UnknownCategory(category.to_string()).into())
    }

    /// Every full package type this registry supports, with its template.
    pub fn package_types(&self) -> Vec<(String, &'static str)> {
        self.frameworks
            .iter()
            .flat_map(|framework| {
                framework.locations().iter().map(move |location| {
                    (
                        format!("{}-{}", framework.prefix(), location.subtype),
                        location.template,
                    )
                })
            })
            .collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
