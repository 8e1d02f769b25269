use std::process::ExitCode;

use anstream::eprintln;
use camino::Utf8PathBuf;
use clap::{CommandFactory, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use owo_colors::OwoColorize;
use url::Url;

use gvm::commands::completions::shell_completions;
use gvm::commands::dir::dir;
use gvm::commands::install::install;
use gvm::commands::list::list;
use gvm::commands::search::search;
use gvm::commands::use_version::use_version;
use gvm::commands::Commands;
use gvm::config::Config;
use gvm::logging::setup_logging;

#[derive(Parser)]
#[command(name = "gvm", version, about = "Install and switch between language toolchains", long_about = None)]
struct Cli {
    /// Directory gvm keeps installed versions in [default: ~/.gvm]
    #[arg(global = true, long, env = "GVM_ROOT_DIR", value_name = "DIR")]
    root_dir: Option<Utf8PathBuf>,

    /// Download from this base URL instead of each language's official one
    #[arg(global = true, long, env = "GVM_DOWNLOAD_URL", hide = true)]
    download_url: Option<Url>,

    /// Control colors in output
    #[arg(
        global = true,
        long,
        value_enum,
        default_value = "auto",
        value_name = "COLOR_CHOICE"
    )]
    color: ColorChoice,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Copy, Clone, clap::ValueEnum)]
enum ColorChoice {
    /// Enables colored output only when the output is going to a terminal or TTY with support.
    Auto,

    /// Enables colored output regardless of the detected environment.
    Always,

    /// Disables colored output.
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(value: ColorChoice) -> Self {
        match value {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    anstream::ColorChoice::write_global(cli.color.into());
    setup_logging(
        cli.verbose.tracing_level_filter(),
        !matches!(cli.color, ColorChoice::Never),
    );

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> miette::Result<()> {
    let config = || Config::new(cli.root_dir.clone(), cli.download_url.clone());

    match cli.command {
        Commands::Install { language, version } => {
            install(&config()?, &language, &version).await?
        }
        Commands::List { language, format } => list(&config()?, &language, format)?,
        Commands::Search {
            language,
            stable_only,
        } => search(&config()?, &language, stable_only).await?,
        Commands::Use {
            language,
            version,
            shell,
        } => use_version(&config()?, &language, &version, shell)?,
        Commands::Dir => dir(&config()?),
        Commands::Completions { shell } => shell_completions(&mut Cli::command(), shell),
    }

    Ok(())
}

/// Prints `Error: <message>: <cause>: ...` followed by any help text.
fn print_error(err: &miette::Report) {
    let message = err
        .chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ");
    eprintln!("{}: {message}", "Error".red().bold());

    if let Some(help) = err.help() {
        eprintln!("  {}: {help}", "help".cyan());
    }
}
