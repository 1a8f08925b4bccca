use anyhow::Result;
use blesta_installer::commands::{self, config::Config};
use blesta_installer::io::ConsoleIo;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// blesta-installer - install paths for Blesta extensions
///
/// Resolves where Composer packages of type `blesta-<subtype>` belong inside
/// a Blesta installation, and removes installed extensions again.
///
/// Custom locations are read from `extra.installer-paths` in the project's
/// composer.json.
///
/// Examples:
///   blesta-installer path blesta-module vendor/my-module
///   blesta-installer supports blesta-gateway-merchant
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory (defaults to the current directory; also via BLESTA_INSTALLER_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "BLESTA_INSTALLER_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the supported package types and their directories
    Types,

    /// Check whether a package type is handled by this installer
    Supports(SupportsArgs),

    /// Print the install path of a package
    Path(PathArgs),

    /// Remove an installed package and its directory
    Uninstall(UninstallArgs),
}

#[derive(clap::Args, Debug)]
pub struct SupportsArgs {
    /// Package type, e.g. "blesta-plugin"
    #[arg(value_name = "TYPE")]
    pub package_type: String,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Package type, e.g. "blesta-plugin"
    #[arg(value_name = "TYPE")]
    pub package_type: String,

    /// Package name in the format "vendor/name"
    #[arg(value_name = "VENDOR/NAME")]
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct UninstallArgs {
    /// Package name in the format "vendor/name"
    #[arg(value_name = "VENDOR/NAME")]
    pub name: String,
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::new(blesta_installer::runtime::RealRuntime, cli.root)?;
    let io = ConsoleIo::stdio();

    match cli.command {
        Commands::Types => commands::types(&config, &io),
        Commands::Supports(args) => {
            commands::supports(&config, &io, &args.package_type);
        }
        Commands::Path(args) => commands::path(&config, &io, &args.package_type, &args.name)?,
        Commands::Uninstall(args) => commands::uninstall(&config, &io, &args.name)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
