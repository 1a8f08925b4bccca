//! Parsing of `<category>-<subtype>` package type strings.

use anyhow::Result;

use crate::error::InstallerError;

/// A package type split at its first hyphen.
///
/// Only the category prefix is peeled off; multi-segment subtypes such as
/// `gateway-merchant` stay whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageType<'a> {
    category: &'a str,
    subtype: &'a str,
}

impl<'a> PackageType<'a> {
    /// Split `raw` on its first hyphen.
    ///
    /// Fails with [`InstallerError::UnsupportedType`] if there is no hyphen.
    pub fn parse(raw: &'a str) -> Result<Self> {
        let (category, subtype) = raw
            .split_once('-')
            .ok_or_else(|| InstallerError::UnsupportedType(raw.to_string()))?;
        Ok(Self { category, subtype })
    }

    pub fn category(&self) -> &'a str {
        self.category
    }

    pub fn subtype(&self) -> &'a str {
        self.subtype
    }
}
