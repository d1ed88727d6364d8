//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Map project-local executables for version-managed runtimes.
#[derive(Debug, Parser)]
#[command(name = "binmap")]
#[command(about = "Map project-local executables for version-managed runtimes")]
#[command(version)]
pub struct Cli {
    /// Directory holding manifest.txt, profiles.json and the listing files
    #[arg(
        short = 'o',
        long = "out-dir",
        global = true,
        env = "BINMAP_OUT_DIR",
        default_value = "."
    )]
    pub out_dir: PathBuf,

    /// Show warnings and per-manifest progress
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["binmap", "paths", "--verbose", "--out-dir", "/tmp/binmap"]);
        assert!(cli.verbose);
        assert_eq!(cli.out_dir, PathBuf::from("/tmp/binmap"));
        assert_eq!(cli.command, Commands::Paths);
    }

    #[test]
    fn test_rehash_args() {
        let cli = Cli::parse_from(["binmap", "-o", "out", "rehash", "-r", "--", "app", "lib"]);
        assert_eq!(
            cli.command,
            Commands::Rehash {
                refresh: true,
                dirs: vec![PathBuf::from("app"), PathBuf::from("lib")],
            }
        );
    }

    #[test]
    fn test_rehash_without_dirs() {
        let cli = Cli::parse_from(["binmap", "rehash"]);
        assert_eq!(
            cli.command,
            Commands::Rehash {
                refresh: false,
                dirs: Vec::new(),
            }
        );
    }

    #[test]
    fn test_which_defaults_to_current_dir() {
        let cli = Cli::parse_from(["binmap", "which", "rake"]);
        assert_eq!(
            cli.command,
            Commands::Which {
                executable: "rake".to_string(),
                dir: PathBuf::from("."),
            }
        );
    }
}
