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

//! The `unset` built-in.

use crate::env::is_valid_name;
use crate::shell::{ExitStatus, ShellState};
use crate::system::System;

pub fn run(shell: &mut ShellState, argv: &[String], _sys: &dyn System) -> ExitStatus {
    let mut status = ExitStatus::SUCCESS;
    for name in &argv[1..] {
        if is_valid_name(name) {
            shell.env.unset(name);
        } else {
            eprintln!("nyxsh: unset: {name}: not a valid identifier");
            status = ExitStatus::FAILURE;
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::system::RealSystem;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn removes_an_existing_binding() {
        let mut env = Environment::new();
        env.set("A", b"1".to_vec());
        let mut shell = ShellState {
            env,
            last_status: ExitStatus::SUCCESS,
            cwd: std::env::temp_dir(),
            interactive: false,
        };
        let status = run(&mut shell, &argv(&["unset", "A"]), &RealSystem);
        assert_eq!(status, ExitStatus::SUCCESS);
        assert!(shell.env.get("A").is_none());
    }

    #[test]
    fn absent_name_is_silently_ignored() {
        let mut shell = ShellState {
            env: Environment::new(),
            last_status: ExitStatus::SUCCESS,
            cwd: std::env::temp_dir(),
            interactive: false,
        };
        let status = run(&mut shell, &argv(&["unset", "NOPE"]), &RealSystem);
        assert_eq!(status, ExitStatus::SUCCESS);
    }

    #[test]
    fn invalid_name_reports_an_error() {
        let mut shell = ShellState {
            env: Environment::new(),
            last_status: ExitStatus::SUCCESS,
            cwd: std::env::temp_dir(),
            interactive: false,
        };
        let status = run(&mut shell, &argv(&["unset", "9bad"]), &RealSystem);
        assert_eq!(status, ExitStatus::FAILURE);
    }
}
