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

//! The `echo` built-in.

use crate::shell::{ExitStatus, ShellState};
use crate::system::System;

pub fn run(_shell: &mut ShellState, argv: &[String], _sys: &dyn System) -> ExitStatus {
    let mut args = &argv[1..];
    let mut suppress_newline = false;
    while let Some(first) = args.first() {
        if first == "-n" {
            suppress_newline = true;
            args = &args[1..];
        } else {
            break;
        }
    }

    print!("{}", args.join(" "));
    if !suppress_newline {
        println!();
    }
    ExitStatus::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::RealSystem;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn echo_always_succeeds() {
        let mut shell = ShellState {
            env: crate::env::Environment::new(),
            last_status: ExitStatus::SUCCESS,
            cwd: std::env::temp_dir(),
            interactive: false,
        };
        let status = run(&mut shell, &argv(&["echo", "a", "b"]), &RealSystem);
        assert_eq!(status, ExitStatus::SUCCESS);
    }
}
