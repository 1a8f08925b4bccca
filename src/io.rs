//! Diagnostic channel between the installer and its host.
//!
//! Best-effort operations (support checks, directory cleanup after an
//! uninstall) never fail their caller. They describe what happened with a
//! [`Diagnostic`] and hand it to the host's [`Io`].

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Output channel supplied by the host.
#[cfg_attr(test, mockall::automock)]
pub trait Io: Send + Sync {
    fn write(&self, message: &str);
    fn write_error(&self, message: &str);
}

impl<T: Io + ?Sized> Io for &T {
    fn write(&self, message: &str) {
        (**self).write(message)
    }

    fn write_error(&self, message: &str) {
        (**self).write_error(message)
    }
}

/// Outcome of a best-effort step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The install directory of an uninstalled package was removed.
    Deleted { path: PathBuf },
    /// The install directory could not be removed.
    NotDeleted { path: PathBuf },
    /// The repository record was removed but the install path could not be resolved.
    UninstallFailed { package: String, reason: String },
    /// A package type names a known category but no known subtype.
    UnsupportedSubtype { package_type: String },
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        !matches!(self, Diagnostic::Deleted { .. })
    }

    /// Send this diagnostic to `io`, on the error stream if it reports a failure.
    pub fn emit(&self, io: &dyn Io) {
        let message = self.to_string();
        if self.is_error() {
            io.write_error(&message);
        } else {
            io.write(&message);
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Deleted { path } => write!(f, "Deleting {} - deleted", path.display()),
            Diagnostic::NotDeleted { path } => {
                write!(f, "Deleting {} - not deleted", path.display())
            }
            Diagnostic::UninstallFailed { package, reason } => {
                write!(f, "Error during uninstall of {}: {}", package, reason)
            }
            Diagnostic::UnsupportedSubtype { package_type } => write!(
                f,
                "Error checking support for package type \"{}\": unknown subtype",
                package_type
            ),
        }
    }
}

/// [`Io`] writing to any pair of output streams.
pub struct ConsoleIo<W: Write + Send, E: Write + Send> {
    out: Mutex<W>,
    err: Mutex<E>,
}

impl ConsoleIo<std::io::Stdout, std::io::Stderr> {
    /// Console output on stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<W: Write + Send, E: Write + Send> ConsoleIo<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    pub fn into_inner(self) -> (W, E) {
        let out = self.out.into_inner().unwrap_or_else(|e| e.into_inner());
        let err = self.err.into_inner().unwrap_or_else(|e| e.into_inner());
        (out, err)
    }
}

fn write_line<T: Write>(stream: &Mutex<T>, message: &str) {
    let mut stream = stream.lock().unwrap_or_else(|e| e.into_inner());
    if let Err(e) = writeln!(stream, "{}", message) {
        log::warn!("Failed to write diagnostic: {}", e);
    }
}

impl<W: Write + Send, E: Write + Send> Io for ConsoleIo<W, E> {
    fn write(&self, message: &str) {
        write_line(&self.out, message);
    }

    fn write_error(&self, message: &str) {
        write_line(&self.err, message);
    }
}
