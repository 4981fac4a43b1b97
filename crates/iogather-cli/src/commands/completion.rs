// Dweve IOGather - Parallel I/O benchmark log aggregation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shell completion generation

use clap::Command;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Write the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use iogather_cli::commands::generate_completion_for_command;
///
/// let mut cmd = Command::new("iogather").subcommand(Command::new("report"));
/// let mut script = Vec::new();
/// generate_completion_for_command(Shell::Bash, &mut cmd, &mut script);
/// assert!(String::from_utf8(script).unwrap().contains("iogather"));
/// ```
pub fn generate_completion_for_command<W: Write>(shell: Shell, cmd: &mut Command, out: &mut W) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Short instructions for enabling completions in `shell`.
pub fn print_installation_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => "# Add to ~/.bashrc:\neval \"$(iogather completion bash)\"\n".to_string(),
        Shell::Zsh => "# Add to ~/.zshrc:\neval \"$(iogather completion zsh)\"\n".to_string(),
        Shell::Fish => {
            "# Save to the fish completions directory:\niogather completion fish > ~/.config/fish/completions/iogather.fish\n"
                .to_string()
        }
        Shell::PowerShell => {
            "# Add to $PROFILE:\niogather completion powershell | Out-String | Invoke-Expression\n"
                .to_string()
        }
        Shell::Elvish => "# Add to ~/.elvish/rc.elv:\neval (iogather completion elvish)\n".to_string(),
        _ => format!("# No installation instructions for {}\n", shell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_name_the_shell() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::Elvish] {
            let text = print_installation_instructions(shell);
            assert!(text.contains(&shell.to_string()), "{}", text);
        }
        assert!(print_installation_instructions(Shell::PowerShell).contains("powershell"));
    }
}
