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

//! The `cd` built-in.
//!
//! Unlike `yash-builtin::cd`, this is the single-operand, no-`$CDPATH`,
//! no-`-L`/`-P` contract spec.md's table states: zero or one argument,
//! `$HOME` default, `$OLDPWD`/`$PWD` bookkeeping only.

use crate::shell::{ExitStatus, ShellState};
use crate::system::System;
use std::path::PathBuf;

pub fn run(shell: &mut ShellState, argv: &[String], sys: &dyn System) -> ExitStatus {
    let target = match argv.get(1) {
        Some(arg) => arg.clone(),
        None => match shell.env.get_str("HOME") {
            Some(home) if !home.is_empty() => home,
            _ => {
                eprintln!("nyxsh: cd: HOME not set");
                return ExitStatus::FAILURE;
            }
        },
    };

    if let Err(e) = sys.chdir(std::path::Path::new(&target)) {
        eprintln!("nyxsh: cd: {target}: {e}");
        return ExitStatus::FAILURE;
    }

    let new_cwd = match sys.getcwd() {
        Ok(cwd) => cwd,
        Err(_) => PathBuf::from(&target),
    };

    let old_pwd = shell
        .env
        .get_str("PWD")
        .unwrap_or_else(|| shell.cwd.to_string_lossy().into_owned());
    shell.env.set("OLDPWD", old_pwd.into_bytes());
    shell
        .env
        .set("PWD", new_cwd.to_string_lossy().into_owned().into_bytes());
    shell.cwd = new_cwd;

    ExitStatus::SUCCESS
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
    fn missing_home_without_operand_is_an_error() {
        let mut env = Environment::new();
        env.unset("HOME");
        let mut shell = ShellState {
            env,
            last_status: ExitStatus::SUCCESS,
            cwd: std::env::temp_dir(),
            interactive: false,
        };
        let status = run(&mut shell, &argv(&["cd"]), &RealSystem);
        assert_eq!(status, ExitStatus::FAILURE);
    }

    #[test]
    fn cd_to_tmp_updates_pwd_and_oldpwd() {
        let original_cwd = std::env::current_dir().unwrap();
        let tmp = std::env::temp_dir();
        let mut env = Environment::new();
        env.set("PWD", b"/somewhere/else".to_vec());
        let mut shell = ShellState {
            env,
            last_status: ExitStatus::SUCCESS,
            cwd: PathBuf::from("/somewhere/else"),
            interactive: false,
        };
        let status = run(
            &mut shell,
            &argv(&["cd", tmp.to_str().unwrap()]),
            &RealSystem,
        );
        assert_eq!(status, ExitStatus::SUCCESS);
        assert_eq!(shell.env.get_str("OLDPWD").unwrap(), "/somewhere/else");
        std::env::set_current_dir(original_cwd).unwrap();
    }
}
