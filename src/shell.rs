// This file is part of nyxsh, a command shell.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The shell-wide mutable state that survives across command lines.

use crate::env::Environment;
use std::io::IsTerminal;
use std::path::PathBuf;

/// An 8-bit command exit status, per spec's exit code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitStatus(pub u8);

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    pub const FAILURE: ExitStatus = ExitStatus(1);
    pub const USAGE_ERROR: ExitStatus = ExitStatus(2);
    pub const NOT_EXECUTABLE: ExitStatus = ExitStatus(126);
    pub const NOT_FOUND: ExitStatus = ExitStatus(127);
    pub const SIGINT: ExitStatus = ExitStatus(130);

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    pub fn from_signal(signal: i32) -> ExitStatus {
        ExitStatus((128 + signal).clamp(0, 255) as u8)
    }
}

/// Owns the environment, the last exit status, the tracked working
/// directory, and whether the shell is running interactively.
pub struct ShellState {
    pub env: Environment,
    pub last_status: ExitStatus,
    pub cwd: PathBuf,
    pub interactive: bool,
}

impl ShellState {
    /// Builds the initial shell state: ingests the process environment in
    /// order, defaults `PWD` from the real working directory if unset, and
    /// bumps `SHLVL` by one (treating a non-numeric `SHLVL` as absent).
    pub fn new() -> Self {
        let mut env = Environment::from_process_env();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));

        if env.get("PWD").is_none() {
            env.set("PWD", cwd.as_os_str().as_encoded_bytes().to_vec());
        }

        let shlvl = env
            .get_str("SHLVL")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);
        env.set("SHLVL", (shlvl + 1).max(1).to_string().into_bytes());

        ShellState {
            env,
            last_status: ExitStatus::SUCCESS,
            cwd,
            interactive: std::io::stdin().is_terminal(),
        }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}
