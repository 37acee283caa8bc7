//! `rubbish completions` - print a shell completion script.

use clap_complete::Shell;
use std::io;

/// Write the completion script for `shell` to stdout.
pub fn execute(shell: Shell, cmd: &mut clap::Command) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut io::stdout());
}
