//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Resolve the manifests for DIRs and rewrite the index
    Rehash {
        /// Keep previously indexed manifests, re-resolving only the given ones
        #[arg(short = 'r', long)]
        refresh: bool,

        /// Project directories (the nearest manifest upwards is used)
        #[arg(value_name = "DIR")]
        dirs: Vec<PathBuf>,
    },

    /// Refresh the runtime profile cache and list it
    Profiles,

    /// Print the path of a project-local executable
    Which {
        /// Executable name
        executable: String,

        /// Directory to resolve the project from
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show resolved configuration and output paths
    Paths,
}
