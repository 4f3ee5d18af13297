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

//! The `env` built-in. With arguments, spec.md explicitly does not require
//! delegating to external `env` semantics (running a program under a
//! modified environment), so arguments beyond the listing are accepted and
//! ignored.

use crate::shell::{ExitStatus, ShellState};
use crate::system::System;

pub fn run(shell: &mut ShellState, _argv: &[String], _sys: &dyn System) -> ExitStatus {
    for (name, value) in shell.env.iter() {
        println!("{name}={}", String::from_utf8_lossy(value));
    }
    ExitStatus::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::system::RealSystem;

    #[test]
    fn env_always_succeeds() {
        let mut env = Environment::new();
        env.set("A", b"1".to_vec());
        let mut shell = ShellState {
            env,
            last_status: ExitStatus::SUCCESS,
            cwd: std::env::temp_dir(),
            interactive: false,
        };
        let status = run(&mut shell, &[], &RealSystem);
        assert_eq!(status, ExitStatus::SUCCESS);
    }
}
