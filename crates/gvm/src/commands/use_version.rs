use anstream::println;

use crate::config::Config;
use crate::shell::{self, Shell};

/// Prints the statement that switches `PATH` to `language` `version`.
///
/// Stdout carries that single line and nothing else, so it can be evaluated.
pub fn use_version(
    config: &Config,
    language: &str,
    version: &str,
    shell: Option<Shell>,
) -> Result<(), shell::Error> {
    let shell = shell.unwrap_or_else(|| config.default_shell());
    let command = shell::compose_use_command(
        &config.store(),
        language,
        version,
        config.path_env.as_deref().unwrap_or_default(),
        config.root(),
        config.path_separator(),
        shell,
    )?;

    println!("{command}");
    Ok(())
}
