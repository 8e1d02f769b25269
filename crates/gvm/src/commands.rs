use clap::Subcommand;

use crate::commands::list::OutputFormat;
use crate::shell::Shell;

pub mod completions;
pub mod dir;
pub mod install;
pub mod list;
pub mod search;
pub mod use_version;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Download and install a version of a language")]
    Install {
        /// Language to install, e.g. `go`
        language: String,

        /// Version to install, e.g. `1.22.3`
        version: String,
    },

    #[command(about = "List the installed versions of a language")]
    List {
        language: String,

        /// Output format for the version list
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Search for versions of a language that can be installed")]
    Search {
        language: String,

        /// Hide pre-releases
        #[arg(long)]
        stable_only: bool,
    },

    #[command(
        about = "Print a shell statement that puts an installed version first on PATH",
        long_about = "Print a shell statement that puts an installed version first on PATH.\n\n\
                      Evaluate the output in your shell, e.g. `eval \"$(gvm use go 1.22.3)\"`."
    )]
    Use {
        language: String,
        version: String,

        /// Shell to print the statement for, detected when omitted
        #[arg(long, value_enum)]
        shell: Option<Shell>,
    },

    #[command(about = "Show the directory where all versions are installed")]
    Dir,

    #[command(about = "Generate shell completion scripts for gvm")]
    Completions { shell: clap_complete::Shell },
}
