//! Install-path resolution for Blesta extensions managed by Composer.
//!
//! Package types of the form `blesta-<subtype>` map to fixed directories
//! inside a Blesta installation:
//!
//! ```
//! use blesta_installer::installer::InstallerPlugin;
//! use blesta_installer::io::ConsoleIo;
//! use blesta_installer::runtime::RealRuntime;
//!
//! let installer = InstallerPlugin::new(RealRuntime, ConsoleIo::stdio());
//! assert!(installer.supports("blesta-gateway-merchant"));
//! assert_eq!(
//!     installer.resolve("blesta-module", "vendor/my-plugin").unwrap(),
//!     "components/modules/my-plugin/"
//! );
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod framework;
pub mod installer;
pub mod io;
pub mod package;
pub mod plugin;
pub mod runtime;

pub use error::InstallerError;
