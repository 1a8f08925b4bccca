//! Error kinds raised by the installer.
//!
//! These travel inside `anyhow::Error`; callers that need to tell them apart
//! use `downcast_ref::<InstallerError>()`.

/// Failures the installer reports to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerError {
    /// The category prefix is not registered in the type registry.
    UnknownCategory(String),
    /// The package type does not parse into a known category and subtype.
    UnsupportedType(String),
    /// Uninstall was requested for a package the repository does not hold.
    PackageNotInstalled(String),
    /// The directory name derived from a package is not a single path segment.
    InvalidInstallName(String),
    /// The install directory does not lie inside the project directory.
    PathOutsideProject(String),
}

impl std::fmt::Display for InstallerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallerError::UnknownCategory(category) => {
                write!(f, "Unknown package category \"{}\"", category)
            }
            InstallerError::UnsupportedType(package_type) => {
                write!(
                    f,
                    "Sorry the package type \"{}\" is not supported.",
                    package_type
                )
            }
            InstallerError::PackageNotInstalled(package) => {
                write!(f, "Package is not installed: {}", package)
            }
            InstallerError::InvalidInstallName(name) => {
                write!(f, "Invalid install directory name \"{}\"", name)
            }
            InstallerError::PathOutsideProject(path) => {
                write!(f, "Install path \"{}\" is outside the project directory", path)
            }
        }
    }
}

impl std::error::Error for InstallerError {}

/// Returns the installer error carried by `error`, if any.
pub fn kind_of(error: &anyhow::Error) -> Option<&InstallerError> {
    error.downcast_ref::<InstallerError>()
}
