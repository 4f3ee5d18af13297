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

//! The `export` built-in.
//!
//! This crate's environment model has no separate exported/local tier (see
//! DESIGN.md): every binding in `Environment` behaves as exported, so
//! `export NAME=VALUE` and `export NAME` both just operate on it directly.
//! `export NAME` on a name with no existing binding creates one with an
//! empty value (the Open Question spec.md §9 leaves unresolved, decided
//! here in favor of create-empty); on an existing binding it is a no-op.

use crate::env::is_valid_name;
use crate::shell::{ExitStatus, ShellState};
use crate::system::System;

pub fn run(shell: &mut ShellState, argv: &[String], _sys: &dyn System) -> ExitStatus {
    if argv.len() == 1 {
        for (name, value) in shell.env.iter() {
            println!("declare -x {name}=\"{}\"", String::from_utf8_lossy(value));
        }
        return ExitStatus::SUCCESS;
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &argv[1..] {
        if let Some((name, value)) = arg.split_once('=') {
            if is_valid_name(name) {
                shell.env.set(name, value.as_bytes().to_vec());
            } else {
                eprintln!("nyxsh: export: {arg}: not a valid identifier");
                status = ExitStatus::FAILURE;
            }
        } else if is_valid_name(arg) {
            if shell.env.get(arg).is_none() {
                shell.env.set(arg.clone(), Vec::new());
            }
        } else {
            eprintln!("nyxsh: export: {arg}: not a valid identifier");
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

    fn shell_with(env: Environment) -> ShellState {
        ShellState {
            env,
            last_status: ExitStatus::SUCCESS,
            cwd: std::env::temp_dir(),
            interactive: false,
        }
    }

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn name_equals_value_sets_a_binding() {
        let mut shell = shell_with(Environment::new());
        let status = run(&mut shell, &argv(&["export", "A=1"]), &RealSystem);
        assert_eq!(status, ExitStatus::SUCCESS);
        assert_eq!(shell.env.get_str("A").unwrap(), "1");
    }

    #[test]
    fn bare_name_with_no_prior_binding_creates_empty() {
        let mut shell = shell_with(Environment::new());
        run(&mut shell, &argv(&["export", "A"]), &RealSystem);
        assert_eq!(shell.env.get_str("A").unwrap(), "");
    }

    #[test]
    fn bare_name_with_prior_binding_is_unchanged() {
        let mut env = Environment::new();
        env.set("A", b"kept".to_vec());
        let mut shell = shell_with(env);
        run(&mut shell, &argv(&["export", "A"]), &RealSystem);
        assert_eq!(shell.env.get_str("A").unwrap(), "kept");
    }

    #[test]
    fn invalid_name_reports_but_does_not_block_other_args() {
        let mut shell = shell_with(Environment::new());
        let status = run(&mut shell, &argv(&["export", "9bad=x", "OK=1"]), &RealSystem);
        assert_eq!(status, ExitStatus::FAILURE);
        assert_eq!(shell.env.get_str("OK").unwrap(), "1");
    }
}
