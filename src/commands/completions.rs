// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shell completion generation

use anyhow::Result;
use clap_complete::Shell;
use std::io::Write;

/// Write completions for `shell` to `out`
pub fn write(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) -> Result<()> {
    let name = command.get_name().to_string();
    clap_complete::generate(shell, command, name, out);
    Ok(())
}

/// Print completions for `shell` to stdout
pub fn run(shell: Shell, mut command: clap::Command) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write(shell, &mut command, &mut stdout)
}
