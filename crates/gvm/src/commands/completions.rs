use std::io::stdout;

use clap_complete::{Shell, generate};

pub fn shell_completions(cmd: &mut clap::Command, shell: Shell) {
    let name = cmd.get_name().to_owned();
    generate(shell, cmd, name, &mut stdout());
}
