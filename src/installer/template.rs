//! Directory template rendering.

use crate::package::Package;

/// Values substituted into `{$var}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars<'a> {
    pub name: &'a str,
    pub vendor: &'a str,
    pub package_type: &'a str,
}

impl<'a> TemplateVars<'a> {
    /// Variables for `package`; `installer-name` overrides the short name.
    pub fn for_package(package: &'a Package) -> Self {
        Self {
            name: package.installer_name().unwrap_or_else(|| package.short_name()),
            vendor: package.vendor(),
            package_type: &package.package_type,
        }
    }
}

/// Whether `name` can stand as one directory name.
pub fn is_single_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Replace `{$name}`, `{$vendor}` and `{$type}` in `template`.
pub fn render(template: &str, vars: &TemplateVars<'_>) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    template
        .replace("{$name}", vars.name)
        .replace("{$vendor}", vars.vendor)
        .replace("{$type}", vars.package_type)
}
