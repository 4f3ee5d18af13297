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

//! The `exit` built-in.
//!
//! Calling `sys.exit` directly is what makes "exit inside a pipeline only
//! exits the child" fall out for free: when this runs inside a pipeline
//! stage's forked child, `sys.exit` ends only that child's process; at top
//! level (never forked) it ends the real shell process.

use crate::shell::{ExitStatus, ShellState};
use crate::system::System;

pub fn run(shell: &mut ShellState, argv: &[String], sys: &dyn System) -> ExitStatus {
    if shell.interactive {
        eprintln!("exit");
    }
    match argv.len() {
        1 => sys.exit(shell.last_status.0 as i32),
        2 => match argv[1].trim().parse::<i64>() {
            Ok(n) => sys.exit(n.rem_euclid(256) as i32),
            Err(_) => {
                eprintln!("nyxsh: exit: {}: numeric argument required", argv[1]);
                sys.exit(ExitStatus::USAGE_ERROR.0 as i32)
            }
        },
        _ => {
            eprintln!("nyxsh: exit: too many arguments");
            ExitStatus::FAILURE
        }
    }
}
